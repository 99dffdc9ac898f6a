//! Playback lifecycle handling
//!
//! On playback start/finish the device's skip ledger entry is overwritten so
//! the next intro window starts fresh. The first episode of a season is
//! pre-marked as skipped unless `skip_first_episode` is set.

use crate::config_gate::ConfigGate;
use crate::host::SessionDirectory;
use crate::ledger::SkipLedger;
use autoskip_common::events::{EventBus, PlaybackLifecycleEvent, SkipEvent};
use autoskip_common::time::now;
use autoskip_common::Session;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// What a lifecycle event did to the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// Save reason is not a playback boundary
    Ignored,
    /// No active session matches the event (teardown race)
    NoSession,
    /// Ledger entry overwritten
    Reset {
        device_id: String,
        /// True when auto-skip is suppressed for this playback
        suppressed: bool,
    },
}

/// Resets skip state on playback start/finish
pub struct LifecycleHandler {
    config: Arc<ConfigGate>,
    sessions: Arc<dyn SessionDirectory>,
    ledger: Arc<SkipLedger>,
    events: EventBus<SkipEvent>,
}

impl LifecycleHandler {
    pub fn new(
        config: Arc<ConfigGate>,
        sessions: Arc<dyn SessionDirectory>,
        ledger: Arc<SkipLedger>,
        events: EventBus<SkipEvent>,
    ) -> Self {
        Self {
            config,
            sessions,
            ledger,
            events,
        }
    }

    /// Handle one user-data-saved notification from the host
    pub async fn handle(&self, event: &PlaybackLifecycleEvent) -> LifecycleOutcome {
        if !event.reason.is_playback_boundary() {
            trace!("Ignoring user data save ({:?})", event.reason);
            return LifecycleOutcome::Ignored;
        }

        let Some(session) = self.find_session(event).await else {
            return LifecycleOutcome::NoSession;
        };

        let config = self.config.snapshot();
        let suppressed = !config.skip_first_episode && event.item.is_first_episode();

        debug!(
            device = %session.device_id,
            suppressed,
            "Resetting seek command state"
        );
        self.ledger.reset(&session.device_id, suppressed);

        self.events.emit_lossy(SkipEvent::SkipStateReset {
            device_id: session.device_id.clone(),
            suppressed,
            timestamp: now(),
        });

        LifecycleOutcome::Reset {
            device_id: session.device_id,
            suppressed,
        }
    }

    /// Active session playing the event's item for the event's user
    async fn find_session(&self, event: &PlaybackLifecycleEvent) -> Option<Session> {
        let sessions = match self.sessions.active_sessions().await {
            Ok(sessions) => sessions,
            Err(e) if e.is_race() => {
                debug!(item = %event.item.id, "Session vanished before lookup: {}", e);
                return None;
            }
            Err(e) => {
                warn!(item = %event.item.id, "Unable to enumerate sessions: {}", e);
                return None;
            }
        };

        let found = sessions.into_iter().find(|session| {
            session.user_id == event.user_id
                && session
                    .now_playing
                    .as_ref()
                    .is_some_and(|np| np.item_id == event.item.id)
        });

        if found.is_none() {
            info!(item = %event.item.id, "Unable to find session for item");
        }
        found
    }
}

impl std::fmt::Debug for LifecycleHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHandler")
            .field("config", &self.config)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}
