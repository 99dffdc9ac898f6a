//! # autoskip Engine
//!
//! Playback monitoring and skip dispatch.
//!
//! **Purpose:** Watch active sessions on a media server and seek each playback
//! past its detected intro exactly once, with an optional on-screen notice.
//!
//! **Architecture:** A 1s polling loop reads host sessions, the intro interval
//! store and a per-device skip ledger; a lifecycle handler resets the ledger on
//! playback start/finish. Host access goes through the traits in [`host`].

mod boundary;

pub mod config_gate;
pub mod dispatcher;
pub mod host;
pub mod intervals;
pub mod ledger;
pub mod lifecycle;
pub mod poller;
pub mod service;

pub use config_gate::ConfigGate;
pub use host::{CommandTransport, HostError, SessionDirectory};
pub use intervals::{InMemoryIntervalStore, IntervalStore};
pub use ledger::SkipLedger;
pub use lifecycle::{LifecycleHandler, LifecycleOutcome};
pub use poller::{PollingLoop, TickReport};
pub use service::{AutoSkipService, HostServices, ServiceHandle};
