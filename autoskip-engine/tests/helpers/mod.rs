//! Test helper modules for autoskip engine integration tests
//!
//! - FakeSessionDirectory / SpyTransport: in-memory host
//! - TestHarness: service wired to the fake host

#![allow(dead_code)]

pub mod fake_host;

pub use fake_host::{idle_session, playing_session, FakeSessionDirectory, SentCommand, SpyTransport};

use autoskip_common::config::SkipConfig;
use autoskip_common::events::{EventBus, PlaybackLifecycleEvent, UserDataSaveReason};
use autoskip_common::{Interval, MediaItemRef};
use autoskip_engine::{AutoSkipService, ConfigGate, HostServices, InMemoryIntervalStore};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Service plus handles on every fake collaborator
pub struct TestHarness {
    pub sessions: Arc<FakeSessionDirectory>,
    pub transport: Arc<SpyTransport>,
    pub intervals: Arc<InMemoryIntervalStore>,
    pub config: Arc<ConfigGate>,
    pub service: AutoSkipService,
    pub lifecycle_bus: EventBus<PlaybackLifecycleEvent>,
    pub user_id: Uuid,
}

impl TestHarness {
    pub fn new(config: SkipConfig) -> Self {
        let sessions = FakeSessionDirectory::new();
        let transport = SpyTransport::new();
        let intervals = Arc::new(InMemoryIntervalStore::new());
        let config = Arc::new(ConfigGate::new(config));

        let service = AutoSkipService::new(
            Arc::clone(&config),
            HostServices {
                sessions: sessions.clone(),
                transport: transport.clone(),
                intervals: intervals.clone(),
            },
        );

        Self {
            sessions,
            transport,
            intervals,
            config,
            service,
            lifecycle_bus: EventBus::new(32),
            user_id: Uuid::new_v4(),
        }
    }

    /// Enabled, default notification, first episodes allowed
    pub fn enabled() -> Self {
        Self::new(SkipConfig {
            enabled: true,
            ..SkipConfig::default()
        })
    }

    /// Register an intro for a fresh item and return the item id
    pub fn add_intro(&self, start: f64, end: f64) -> Uuid {
        let item_id = Uuid::new_v4();
        self.intervals
            .insert(Interval::from_detection(item_id, start, end));
        item_id
    }

    /// Start playing `item_id` on `device_id` at `seconds`
    pub fn play(&self, device_id: &str, item_id: Uuid, seconds: i64) {
        self.sessions
            .add(playing_session(device_id, self.user_id, item_id, seconds));
    }

    pub fn lifecycle_event(
        &self,
        item_id: Uuid,
        index_number: Option<i32>,
        reason: UserDataSaveReason,
    ) -> PlaybackLifecycleEvent {
        PlaybackLifecycleEvent::new(
            self.user_id,
            MediaItemRef::new(item_id, index_number),
            reason,
        )
    }
}

/// Poll `condition` until it holds or `timeout` passes
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
