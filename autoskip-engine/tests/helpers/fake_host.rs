//! In-memory host for driving the engine in tests

use async_trait::async_trait;
use autoskip_common::time::TICKS_PER_SECOND;
use autoskip_common::{NowPlaying, Session};
use autoskip_engine::host::{
    CommandTransport, HostError, MessageCommand, PlaystateRequest, SessionDirectory,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Session directory whose contents tests mutate directly
#[derive(Default)]
pub struct FakeSessionDirectory {
    sessions: Mutex<Vec<Session>>,
    failure: Mutex<Option<HostError>>,
}

impl FakeSessionDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, session: Session) {
        self.sessions.lock().unwrap().push(session);
    }

    pub fn clear(&self) {
        self.sessions.lock().unwrap().clear();
    }

    /// Move the session on `device_id` to `seconds`
    pub fn set_position(&self, device_id: &str, seconds: i64) {
        let mut sessions = self.sessions.lock().unwrap();
        for session in sessions.iter_mut().filter(|s| s.device_id == device_id) {
            if let Some(np) = session.now_playing.as_mut() {
                np.position_ticks = seconds * TICKS_PER_SECOND;
            }
        }
    }

    /// Make every enumeration fail with `error` (None to recover)
    pub fn fail_with(&self, error: Option<HostError>) {
        *self.failure.lock().unwrap() = error;
    }
}

#[async_trait]
impl SessionDirectory for FakeSessionDirectory {
    async fn active_sessions(&self) -> Result<Vec<Session>, HostError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.sessions.lock().unwrap().clone())
    }
}

/// Command recorded by the spy transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentCommand {
    Message {
        session_id: String,
        command: MessageCommand,
    },
    Playstate {
        session_id: String,
        request: PlaystateRequest,
    },
}

/// Transport that records every command it is handed
#[derive(Default)]
pub struct SpyTransport {
    sent: Mutex<Vec<SentCommand>>,
    reject: Mutex<bool>,
}

impl SpyTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Refuse all commands (they are still recorded)
    pub fn reject_all(&self, reject: bool) {
        *self.reject.lock().unwrap() = reject;
    }

    pub fn sent(&self) -> Vec<SentCommand> {
        self.sent.lock().unwrap().clone()
    }

    pub fn seeks(&self) -> Vec<(String, PlaystateRequest)> {
        self.sent()
            .into_iter()
            .filter_map(|cmd| match cmd {
                SentCommand::Playstate { session_id, request } => Some((session_id, request)),
                SentCommand::Message { .. } => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<(String, MessageCommand)> {
        self.sent()
            .into_iter()
            .filter_map(|cmd| match cmd {
                SentCommand::Message { session_id, command } => Some((session_id, command)),
                SentCommand::Playstate { .. } => None,
            })
            .collect()
    }

    fn record(&self, command: SentCommand) -> Result<(), HostError> {
        self.sent.lock().unwrap().push(command);
        if *self.reject.lock().unwrap() {
            Err(HostError::Transport("client disconnected".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CommandTransport for SpyTransport {
    async fn send_message(
        &self,
        session_id: &str,
        command: MessageCommand,
    ) -> Result<(), HostError> {
        self.record(SentCommand::Message {
            session_id: session_id.to_string(),
            command,
        })
    }

    async fn send_playstate(
        &self,
        session_id: &str,
        request: PlaystateRequest,
    ) -> Result<(), HostError> {
        self.record(SentCommand::Playstate {
            session_id: session_id.to_string(),
            request,
        })
    }
}

/// Session on `device_id` playing `item_id` at `seconds`
pub fn playing_session(device_id: &str, user_id: Uuid, item_id: Uuid, seconds: i64) -> Session {
    Session {
        id: format!("session-{}", device_id),
        device_id: device_id.to_string(),
        user_id,
        now_playing: Some(NowPlaying {
            item_id,
            position_ticks: seconds * TICKS_PER_SECOND,
        }),
    }
}

/// Session on `device_id` with nothing playing
pub fn idle_session(device_id: &str, user_id: Uuid) -> Session {
    Session {
        id: format!("session-{}", device_id),
        device_id: device_id.to_string(),
        user_id,
        now_playing: None,
    }
}
