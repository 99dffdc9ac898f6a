//! Auto-skip service
//!
//! Wires the config gate, skip ledger, lifecycle handler and polling loop
//! around injected host collaborators. `start()` subscribes to lifecycle events
//! and configuration changes; the returned [`ServiceHandle`] tears everything
//! down on `shutdown()` or when dropped.

use crate::boundary::guarded;
use crate::config_gate::ConfigGate;
use crate::dispatcher::CommandDispatcher;
use crate::host::{CommandTransport, SessionDirectory};
use crate::intervals::IntervalStore;
use crate::ledger::SkipLedger;
use crate::lifecycle::LifecycleHandler;
use crate::poller::PollingLoop;
use autoskip_common::config::SkipConfig;
use autoskip_common::events::{EventBus, PlaybackLifecycleEvent, SkipEvent};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default capacity of the SkipEvent bus
pub const EVENT_BUS_CAPACITY: usize = 100;

/// Injected host collaborators
#[derive(Clone)]
pub struct HostServices {
    pub sessions: Arc<dyn SessionDirectory>,
    pub transport: Arc<dyn CommandTransport>,
    pub intervals: Arc<dyn IntervalStore>,
}

/// Intro auto-skip service
pub struct AutoSkipService {
    config: Arc<ConfigGate>,
    ledger: Arc<SkipLedger>,
    lifecycle: Arc<LifecycleHandler>,
    poller: Arc<PollingLoop>,
    events: EventBus<SkipEvent>,
}

impl AutoSkipService {
    pub fn new(config: Arc<ConfigGate>, host: HostServices) -> Self {
        let ledger = Arc::new(SkipLedger::new());
        let events = EventBus::new(EVENT_BUS_CAPACITY);

        let lifecycle = Arc::new(LifecycleHandler::new(
            Arc::clone(&config),
            Arc::clone(&host.sessions),
            Arc::clone(&ledger),
            events.clone(),
        ));

        let poller = Arc::new(PollingLoop::new(
            Arc::clone(&config),
            host.sessions,
            host.intervals,
            Arc::clone(&ledger),
            CommandDispatcher::new(host.transport),
            events.clone(),
        ));

        Self {
            config,
            ledger,
            lifecycle,
            poller,
            events,
        }
    }

    pub fn config(&self) -> &Arc<ConfigGate> {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<SkipLedger> {
        &self.ledger
    }

    pub fn lifecycle(&self) -> &Arc<LifecycleHandler> {
        &self.lifecycle
    }

    pub fn poller(&self) -> &Arc<PollingLoop> {
        &self.poller
    }

    /// Bus carrying IntroSkipped / SkipStateReset / PollingStateChanged
    pub fn events(&self) -> &EventBus<SkipEvent> {
        &self.events
    }

    /// Publish new configuration and apply `enabled` before returning
    pub fn update_config(&self, config: SkipConfig) {
        let enabled = config.enabled;
        self.config.update(config);
        self.poller.set_running(enabled);
    }

    /// Subscribe to host events and start polling if enabled
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        &self,
        lifecycle_events: broadcast::Receiver<PlaybackLifecycleEvent>,
    ) -> ServiceHandle {
        let cancel = CancellationToken::new();

        // Subscribe before applying so a change racing startup is not lost
        let config_rx = self.config.subscribe();
        self.poller.set_running(self.config.enabled());

        let tasks = vec![
            tokio::spawn(lifecycle_listener(
                Arc::clone(&self.lifecycle),
                lifecycle_events,
                cancel.clone(),
            )),
            tokio::spawn(config_listener(
                Arc::clone(&self.poller),
                config_rx,
                cancel.clone(),
            )),
        ];

        info!("Auto-skip service started");
        ServiceHandle {
            cancel,
            tasks,
            poller: Arc::clone(&self.poller),
        }
    }
}

impl std::fmt::Debug for AutoSkipService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSkipService")
            .field("config", &self.config)
            .field("poller", &self.poller)
            .finish_non_exhaustive()
    }
}

/// Running service subscriptions
///
/// Dropping the handle unsubscribes and stops the polling timer without
/// waiting; `shutdown()` additionally waits for the tasks to exit.
#[must_use = "dropping the handle stops the service"]
pub struct ServiceHandle {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    poller: Arc<PollingLoop>,
}

impl ServiceHandle {
    /// Stop polling, unsubscribe, and wait for in-flight work to finish
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        let timer = self.poller.stop();

        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                warn!("Auto-skip task ended abnormally: {}", e);
            }
        }
        if let Some(timer) = timer {
            if let Err(e) = timer.await {
                warn!("Polling task ended abnormally: {}", e);
            }
        }

        info!("Auto-skip service stopped");
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.poller.stop();
    }
}

async fn lifecycle_listener(
    handler: Arc<LifecycleHandler>,
    mut rx: broadcast::Receiver<PlaybackLifecycleEvent>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => received,
        };

        match event {
            Ok(event) => {
                let handler = Arc::clone(&handler);
                guarded("Lifecycle event handler", async move {
                    handler.handle(&event).await;
                })
                .await;
            }
            Err(RecvError::Lagged(missed)) => {
                warn!("Lifecycle listener lagged, {} events dropped", missed);
            }
            Err(RecvError::Closed) => {
                debug!("Lifecycle event source closed");
                break;
            }
        }
    }
}

async fn config_listener(
    poller: Arc<PollingLoop>,
    mut rx: tokio::sync::watch::Receiver<SkipConfig>,
    cancel: CancellationToken,
) {
    loop {
        let changed = tokio::select! {
            _ = cancel.cancelled() => break,
            changed = rx.changed() => changed,
        };
        if changed.is_err() {
            break;
        }

        let enabled = rx.borrow_and_update().enabled;
        if cancel.is_cancelled() {
            break;
        }
        poller.set_running(enabled);
    }
}
