//! Playback lifecycle event types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::MediaItemRef;

/// Why the host saved a user's playback data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserDataSaveReason {
    /// Playback of an item started
    PlaybackStart,
    /// Periodic progress report during playback
    PlaybackProgress,
    /// Playback of an item finished or was stopped
    PlaybackFinished,
    /// User toggled the played flag
    TogglePlayed,
    /// User changed a rating
    UpdateUserRating,
    /// Data imported from elsewhere
    Import,
}

impl UserDataSaveReason {
    /// Only playback start and finish reset the skip ledger
    pub fn is_playback_boundary(self) -> bool {
        matches!(self, Self::PlaybackStart | Self::PlaybackFinished)
    }
}

/// User playback data was saved by the host
///
/// Pushed by the host for every save; the engine filters by `reason`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackLifecycleEvent {
    /// User whose data was saved
    pub user_id: Uuid,
    /// Item the data belongs to
    pub item: MediaItemRef,
    /// Why the data was saved
    pub reason: UserDataSaveReason,
    /// When the host saved the data
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl PlaybackLifecycleEvent {
    pub fn new(user_id: Uuid, item: MediaItemRef, reason: UserDataSaveReason) -> Self {
        Self {
            user_id,
            item,
            reason,
            timestamp: crate::time::now(),
        }
    }
}
