//! Shared data model
//!
//! Snapshots of host sessions and the intro intervals produced by the
//! detection pipeline. The engine only reads these values.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::ticks_to_seconds;

/// Reference to a media item as carried on lifecycle events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItemRef {
    /// Media item identifier
    pub id: Uuid,
    /// Episode index within its season (None for movies or unknown)
    #[serde(default)]
    pub index_number: Option<i32>,
}

impl MediaItemRef {
    pub fn new(id: Uuid, index_number: Option<i32>) -> Self {
        Self { id, index_number }
    }

    /// True when this item is the first episode of its season
    pub fn is_first_episode(&self) -> bool {
        self.index_number == Some(1)
    }
}

/// Item currently playing in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Media item identifier
    pub item_id: Uuid,
    /// Playback position in host ticks
    #[serde(default)]
    pub position_ticks: i64,
}

impl NowPlaying {
    /// Playback position in whole seconds
    pub fn position_seconds(&self) -> i64 {
        ticks_to_seconds(self.position_ticks)
    }
}

/// Snapshot of an active host session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier, used to address commands
    pub id: String,
    /// Stable device identifier, keys the skip ledger
    pub device_id: String,
    /// Owning user
    pub user_id: Uuid,
    /// Currently playing item, if any
    #[serde(default)]
    pub now_playing: Option<NowPlaying>,
}

/// Detected intro interval for a media item
///
/// Offsets are in seconds from the start of the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Media item this interval belongs to
    pub item_id: Uuid,
    /// Intro start offset (seconds)
    pub start: f64,
    /// Intro end offset (seconds)
    pub end: f64,
    /// False means "no actionable interval"
    pub valid: bool,
}

impl Interval {
    /// Build an interval the way the detection pipeline reports it:
    /// an interval is only valid if it ends after the start of the item.
    pub fn from_detection(item_id: Uuid, start: f64, end: f64) -> Self {
        Self {
            item_id,
            start,
            end,
            valid: end > 0.0,
        }
    }
}
