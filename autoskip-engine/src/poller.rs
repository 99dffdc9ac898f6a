//! Intro skip polling loop
//!
//! Once a second, while enabled, every active session is checked against the
//! interval store and the skip ledger. A session whose position is inside its
//! item's intro gets (at most once per playback) an optional notification and
//! a seek to the end of the intro.
//!
//! The timer only runs while `SkipConfig::enabled` is true; the service starts
//! and stops it on configuration changes.

use crate::boundary::guarded;
use crate::config_gate::ConfigGate;
use crate::dispatcher::CommandDispatcher;
use crate::host::SessionDirectory;
use crate::intervals::IntervalStore;
use crate::ledger::SkipLedger;
use autoskip_common::config::SkipConfig;
use autoskip_common::events::{EventBus, SkipEvent};
use autoskip_common::time::{now, seconds_to_ticks};
use autoskip_common::{Interval, Session};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Timer period
pub const POLL_PERIOD: Duration = Duration::from_secs(1);

/// Never skip before playback has had this many seconds to stabilise
pub const MIN_SKIP_POSITION: i64 = 5;

/// Seek target (seconds) if `position` falls inside the interval's skip window
///
/// The window is `[max(MIN_SKIP_POSITION, start), end]`, both ends inclusive.
/// The target is the truncated intro end minus the seconds of intro to keep;
/// it is not clamped, so a large `seconds_of_intro_to_play` can land before
/// the intro start or below zero.
pub fn skip_target(
    position: i64,
    interval: &Interval,
    seconds_of_intro_to_play: i64,
) -> Option<i64> {
    let effective_start = interval.start.max(MIN_SKIP_POSITION as f64);
    let position = position as f64;

    if position < effective_start || position > interval.end {
        return None;
    }

    Some((interval.end as i64).saturating_sub(seconds_of_intro_to_play))
}

/// Result of one poll tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Sessions returned by the host
    pub sessions_seen: usize,
    /// Seek commands dispatched this tick
    pub skips_dispatched: usize,
}

struct RunningTimer {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Timer-driven session scanner
pub struct PollingLoop {
    config: Arc<ConfigGate>,
    sessions: Arc<dyn SessionDirectory>,
    intervals: Arc<dyn IntervalStore>,
    ledger: Arc<SkipLedger>,
    dispatcher: CommandDispatcher,
    events: EventBus<SkipEvent>,
    timer: Mutex<Option<RunningTimer>>,
}

impl PollingLoop {
    pub fn new(
        config: Arc<ConfigGate>,
        sessions: Arc<dyn SessionDirectory>,
        intervals: Arc<dyn IntervalStore>,
        ledger: Arc<SkipLedger>,
        dispatcher: CommandDispatcher,
        events: EventBus<SkipEvent>,
    ) -> Self {
        Self {
            config,
            sessions,
            intervals,
            ledger,
            dispatcher,
            events,
            timer: Mutex::new(None),
        }
    }

    /// Whether the timer is currently running
    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Start or stop the timer so that it matches `running`
    pub fn set_running(self: &Arc<Self>, running: bool) {
        if running {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Start the timer (no-op if already running)
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>) {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if timer.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(Arc::clone(self).run(cancel.clone()));
        *timer = Some(RunningTimer { cancel, task });
        drop(timer);

        info!("Intro skip polling started ({}ms period)", POLL_PERIOD.as_millis());
        self.events.emit_lossy(SkipEvent::PollingStateChanged {
            running: true,
            timestamp: now(),
        });
    }

    /// Stop the timer
    ///
    /// An in-flight tick is allowed to finish. Returns the timer task so async
    /// callers can wait for it; `None` if the timer was not running.
    pub fn stop(&self) -> Option<JoinHandle<()>> {
        let running = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        running.cancel.cancel();

        info!("Intro skip polling stopped");
        self.events.emit_lossy(SkipEvent::PollingStateChanged {
            running: false,
            timestamp: now(),
        });
        Some(running.task)
    }

    async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut timer = interval(POLL_PERIOD);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = timer.tick() => {}
            }

            let poller = Arc::clone(&self);
            guarded("Intro skip poll tick", async move { poller.tick().await }).await;
        }

        debug!("Intro skip polling task exited");
    }

    /// Scan all active sessions once
    ///
    /// Each session is checked inside its own failure boundary, so a panic
    /// while handling one session only skips that session.
    pub async fn tick(self: &Arc<Self>) -> TickReport {
        let config = self.config.snapshot();
        let mut report = TickReport::default();

        let sessions = match self.sessions.active_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!("Unable to enumerate sessions: {}", e);
                return report;
            }
        };

        report.sessions_seen = sessions.len();
        for session in sessions {
            let poller = Arc::clone(self);
            let config = config.clone();
            let skipped = guarded("Intro skip session check", async move {
                poller.check_session(&session, &config).await
            })
            .await;

            if skipped == Some(true) {
                report.skips_dispatched += 1;
            }
        }

        if report.skips_dispatched > 0 {
            debug!(
                "Poll tick: {} sessions, {} skips",
                report.sessions_seen, report.skips_dispatched
            );
        }
        report
    }

    /// Returns true if a skip was dispatched for this session
    async fn check_session(&self, session: &Session, config: &SkipConfig) -> bool {
        let Some(now_playing) = &session.now_playing else {
            return false;
        };
        let device_id = session.device_id.as_str();
        let position = now_playing.position_seconds();

        if self.ledger.is_issued(device_id) {
            trace!(device = device_id, "Seek command already sent");
            return false;
        }

        let Some(intro) = self.intervals.lookup(&now_playing.item_id) else {
            trace!(item = %now_playing.item_id, "No intro detected");
            return false;
        };
        if !intro.valid {
            trace!(item = %now_playing.item_id, "Intro interval not valid");
            return false;
        }

        let Some(target_seconds) = skip_target(position, &intro, config.seconds_of_intro_to_play)
        else {
            trace!(device = device_id, position, "Outside intro window");
            return false;
        };

        // A lifecycle reset may have landed since the read above; claim atomically
        if !self.ledger.try_claim(device_id) {
            return false;
        }

        debug!(
            device = device_id,
            session = %session.id,
            position,
            target_seconds,
            "Skipping intro"
        );

        if let Some(text) = config.notification() {
            self.dispatcher.send_notification(session, text).await;
        }

        let target_ticks = seconds_to_ticks(target_seconds);
        self.dispatcher.send_seek(session, target_ticks).await;

        self.events.emit_lossy(SkipEvent::IntroSkipped {
            device_id: session.device_id.clone(),
            session_id: session.id.clone(),
            item_id: now_playing.item_id,
            seek_target_ticks: target_ticks,
            timestamp: now(),
        });

        true
    }
}

impl std::fmt::Debug for PollingLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingLoop")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
