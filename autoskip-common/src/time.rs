//! Timestamp and tick utilities
//!
//! The host reports playback positions in 100ns ticks. Intro offsets and the
//! polling arithmetic work in whole seconds.

use chrono::{DateTime, Utc};

/// Number of host ticks in one second (100ns resolution)
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert host ticks to whole seconds (truncating toward zero)
pub fn ticks_to_seconds(ticks: i64) -> i64 {
    ticks / TICKS_PER_SECOND
}

/// Convert whole seconds to host ticks
///
/// Saturates instead of overflowing for absurd inputs.
pub fn seconds_to_ticks(seconds: i64) -> i64 {
    seconds.saturating_mul(TICKS_PER_SECOND)
}
