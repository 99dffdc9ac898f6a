//! # autoskip Common Library
//!
//! Shared code for the autoskip crates including:
//! - Session and intro interval data model
//! - Event types (lifecycle events, SkipEvent) and the EventBus
//! - Configuration loading
//! - Tick/second conversion
//! - Logging setup

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod model;
pub mod time;

pub use error::{Error, Result};
pub use model::{Interval, MediaItemRef, NowPlaying, Session};
