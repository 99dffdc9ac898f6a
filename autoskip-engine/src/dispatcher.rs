//! Command dispatch to host sessions
//!
//! Fire-and-forget: failures are logged here and never reported back to the
//! polling loop.

use crate::host::{CommandTransport, MessageCommand, PlaystateCommand, PlaystateRequest};
use autoskip_common::Session;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How long clients should show the skip notification
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(2000);

/// Sends notifications and seek commands through the host transport
#[derive(Clone)]
pub struct CommandDispatcher {
    transport: Arc<dyn CommandTransport>,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        Self { transport }
    }

    /// Show a short on-screen message on the session's client
    pub async fn send_notification(&self, session: &Session, text: &str) {
        let command = MessageCommand {
            header: String::new(),
            text: text.to_string(),
            timeout: NOTIFICATION_TIMEOUT,
        };

        match self.transport.send_message(&session.id, command).await {
            Ok(()) => debug!(session = %session.id, "Sent skip notification"),
            Err(e) => warn!(session = %session.id, "Failed to send skip notification: {}", e),
        }
    }

    /// Seek the session to an absolute position, attributed to its user
    pub async fn send_seek(&self, session: &Session, target_ticks: i64) {
        let request = PlaystateRequest {
            command: PlaystateCommand::Seek,
            seek_position_ticks: target_ticks,
            controlling_user_id: session.user_id,
        };

        match self.transport.send_playstate(&session.id, request).await {
            Ok(()) => debug!(
                session = %session.id,
                target_ticks,
                "Sent seek command"
            ),
            Err(e) => warn!(session = %session.id, "Failed to send seek command: {}", e),
        }
    }
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher").finish_non_exhaustive()
    }
}
