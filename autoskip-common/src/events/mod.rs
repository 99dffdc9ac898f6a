//! Event types for the autoskip event system
//!
//! Provides lifecycle events pushed by the host, skip events published by the
//! engine, and the broadcast EventBus both travel on.

mod lifecycle_types;

pub use lifecycle_types::{PlaybackLifecycleEvent, UserDataSaveReason};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events published by the skip engine
///
/// Observers (UI, diagnostics, tests) subscribe through an `EventBus<SkipEvent>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SkipEvent {
    /// Seek command dispatched past a detected intro
    IntroSkipped {
        /// Device the skip was issued for
        device_id: String,
        /// Session the command was addressed to
        session_id: String,
        /// Item being played
        item_id: Uuid,
        /// Absolute seek target in host ticks
        seek_target_ticks: i64,
        /// When the command was dispatched
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Skip ledger entry overwritten by a playback start/finish
    SkipStateReset {
        /// Device whose entry was reset
        device_id: String,
        /// True when auto-skip is suppressed for the next window
        suppressed: bool,
        /// When the entry was reset
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Polling timer started or stopped
    PollingStateChanged {
        /// Whether the timer is now running
        running: bool,
        /// When the state changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Broadcast event bus
///
/// Thin wrapper over `tokio::sync::broadcast`. Slow receivers lag and lose the
/// oldest events rather than blocking the sender.
///
/// # Examples
///
/// ```
/// use autoskip_common::events::{EventBus, SkipEvent};
///
/// let bus: EventBus<SkipEvent> = EventBus::new(100);
/// let _rx = bus.subscribe();
/// bus.emit_lossy(SkipEvent::PollingStateChanged {
///     running: true,
///     timestamp: chrono::Utc::now(),
/// });
/// ```
#[derive(Debug, Clone)]
pub struct EventBus<T: Clone> {
    tx: broadcast::Sender<T>,
    capacity: usize,
}

impl<T: Clone> EventBus<T> {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: T) -> Result<usize, broadcast::error::SendError<T>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: T) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
