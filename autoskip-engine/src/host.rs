//! Host collaborator boundary
//!
//! The media server owns sessions and command delivery. The engine talks to it
//! only through these traits so it can be embedded in any host (or a fake one
//! in tests).

use async_trait::async_trait;
use autoskip_common::Session;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors reported by the host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Session ended between lookup and use
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Item or user no longer exists on the host
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Host service temporarily unavailable
    #[error("Host unavailable: {0}")]
    Unavailable(String),

    /// Command could not be handed to the client transport
    #[error("Transport error: {0}")]
    Transport(String),
}

impl HostError {
    /// Races between event delivery and session teardown are expected
    pub fn is_race(&self) -> bool {
        matches!(self, Self::SessionNotFound(_) | Self::ResourceNotFound(_))
    }
}

/// On-screen text message for a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCommand {
    /// Optional header line
    pub header: String,
    /// Message body
    pub text: String,
    /// How long the client should show the message
    pub timeout: Duration,
}

/// Playstate command kinds the engine issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaystateCommand {
    /// Jump to an absolute position
    Seek,
}

/// Playstate request addressed to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaystateRequest {
    pub command: PlaystateCommand,
    /// Absolute target position in host ticks
    pub seek_position_ticks: i64,
    /// User the command is attributed to
    pub controlling_user_id: Uuid,
}

/// Enumerates active playback sessions
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// Snapshot of all active sessions (may be empty)
    async fn active_sessions(&self) -> Result<Vec<Session>, HostError>;
}

/// Delivers commands to sessions
///
/// Delivery is fire-and-forget: `Ok` means the host accepted the command,
/// not that the client acted on it.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    async fn send_message(&self, session_id: &str, command: MessageCommand)
        -> Result<(), HostError>;

    async fn send_playstate(
        &self,
        session_id: &str,
        request: PlaystateRequest,
    ) -> Result<(), HostError>;
}
