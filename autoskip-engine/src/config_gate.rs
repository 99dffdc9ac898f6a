//! Observable runtime configuration
//!
//! Holds the current [`SkipConfig`] in a `tokio::sync::watch` channel. Readers
//! take a fresh snapshot on every tick/event; the service subscribes to
//! changes to start and stop the polling timer.

use autoskip_common::config::SkipConfig;
use tokio::sync::watch;
use tracing::info;

/// Process-wide skip configuration with change notification
#[derive(Debug)]
pub struct ConfigGate {
    tx: watch::Sender<SkipConfig>,
}

impl ConfigGate {
    pub fn new(initial: SkipConfig) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Latest configuration
    pub fn snapshot(&self) -> SkipConfig {
        self.tx.borrow().clone()
    }

    /// Whether auto-skip is currently enabled
    pub fn enabled(&self) -> bool {
        self.tx.borrow().enabled
    }

    /// Replace the configuration and notify subscribers
    pub fn update(&self, config: SkipConfig) {
        log_update(&config);
        self.tx.send_replace(config);
    }

    /// Edit the configuration in place and notify subscribers
    pub fn modify(&self, edit: impl FnOnce(&mut SkipConfig)) {
        self.tx.send_modify(|config| {
            edit(config);
            log_update(config);
        });
    }

    /// Receiver that wakes on every change
    pub fn subscribe(&self) -> watch::Receiver<SkipConfig> {
        self.tx.subscribe()
    }
}

fn log_update(config: &SkipConfig) {
    info!(
        "Skip configuration updated (enabled: {}, skip_first_episode: {}, seconds_of_intro_to_play: {})",
        config.enabled, config.skip_first_episode, config.seconds_of_intro_to_play
    );
}

impl Default for ConfigGate {
    fn default() -> Self {
        Self::new(SkipConfig::default())
    }
}
