//! Per-device skip ledger
//!
//! Tracks whether a skip was already issued for the current playback on each
//! device. Written by both the polling loop and the lifecycle handler.
//!
//! Every operation holds the guard for exactly one map access and never
//! across an `.await`, so dispatch and session enumeration are not
//! serialised behind it.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Device id -> "skip already issued for current playback"
///
/// Entries are never removed; a stale entry is superseded by the next
/// playback start on the same device.
#[derive(Debug, Default)]
pub struct SkipLedger {
    entries: Mutex<HashMap<String, bool>>,
}

impl SkipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, bool>> {
        // A panic while holding the guard cannot leave a bool half-written
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True if a skip was already issued (or suppressed) for this device
    pub fn is_issued(&self, device_id: &str) -> bool {
        self.entries().get(device_id).copied().unwrap_or(false)
    }

    /// Atomically mark the device as skipped
    ///
    /// Returns `true` only for the caller that flipped the flag, so two
    /// concurrent claimants can never both dispatch.
    pub fn try_claim(&self, device_id: &str) -> bool {
        let mut entries = self.entries();
        let issued = entries.entry(device_id.to_string()).or_insert(false);
        if *issued {
            false
        } else {
            *issued = true;
            true
        }
    }

    /// Overwrite the entry for the next playback window (no merge)
    pub fn reset(&self, device_id: &str, issued: bool) {
        self.entries().insert(device_id.to_string(), issued);
    }

    /// Number of devices ever seen
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
