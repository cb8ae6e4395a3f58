//! Inbound and outbound realtime event bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskhub_core::types::{ConnectionId, TaskId, UserId};
use taskhub_entity::user::UserRole;

use super::envelope::Envelope;

/// Outbound event names owned by the gateway.
pub mod names {
    pub const CONNECTED: &str = "connected";
    pub const PONG: &str = "pong";
    pub const USER_STATUS_UPDATE: &str = "user:status:update";
    pub const TYPING_UPDATE: &str = "task:typing:update";
    pub const ERROR: &str = "error";
}

/// Largest inbound frame accepted, in bytes.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Why an inbound frame was rejected.
#[derive(Debug, Error)]
pub enum InboundError {
    #[error("Message exceeds maximum size of {MAX_FRAME_SIZE} bytes")]
    TooLarge,
    #[error("Failed to parse message: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("Unknown event: {0}")]
    UnknownEvent(String),
    #[error("Invalid data for {event}: {source}")]
    InvalidData {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}

impl InboundError {
    /// Code sent back in the `error` event.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooLarge => "MESSAGE_TOO_LARGE",
            Self::Malformed(_) => "INVALID_MESSAGE",
            Self::UnknownEvent(_) => "UNKNOWN_EVENT",
            Self::InvalidData { .. } => "INVALID_DATA",
        }
    }
}

/// Events a client may send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Liveness check; answered with `pong`.
    Ping,
    /// Free-form presence status, relayed to admins.
    UserStatus { status: String },
    /// Typing indicator, relayed to every other session.
    TaskTyping { task_id: TaskId, is_typing: bool },
}

#[derive(Deserialize)]
struct UserStatusData {
    status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskTypingData {
    task_id: TaskId,
    #[serde(default)]
    is_typing: bool,
}

impl InboundMessage {
    /// Parse one text frame.
    pub fn parse(text: &str) -> Result<Self, InboundError> {
        if text.len() > MAX_FRAME_SIZE {
            return Err(InboundError::TooLarge);
        }
        let frame: Envelope = serde_json::from_str(text).map_err(InboundError::Malformed)?;
        let invalid = |source| InboundError::InvalidData {
            event: frame.event.clone(),
            source,
        };

        match frame.event.as_str() {
            "ping" => Ok(Self::Ping),
            "user:status" => {
                let data: UserStatusData =
                    serde_json::from_value(frame.data.clone()).map_err(invalid)?;
                Ok(Self::UserStatus {
                    status: data.status,
                })
            }
            "task:typing" => {
                let data: TaskTypingData =
                    serde_json::from_value(frame.data.clone()).map_err(invalid)?;
                Ok(Self::TaskTyping {
                    task_id: data.task_id,
                    is_typing: data.is_typing,
                })
            }
            other => Err(InboundError::UnknownEvent(other.to_string())),
        }
    }
}

/// Body of `connected`, sent once right after the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connected {
    pub message: String,
    pub user_id: UserId,
    pub user_name: String,
    pub user_role: UserRole,
    pub socket_id: ConnectionId,
    pub timestamp: DateTime<Utc>,
}

/// Body of `pong`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pong {
    pub timestamp: DateTime<Utc>,
}

/// Body of `user:status:update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusUpdate {
    pub user_id: UserId,
    pub user_name: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of `task:typing:update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingUpdate {
    pub user_id: UserId,
    pub user_name: String,
    pub task_id: TaskId,
    pub is_typing: bool,
}

/// Body of `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl From<&InboundError> for ErrorPayload {
    fn from(err: &InboundError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_events() {
        assert_eq!(InboundMessage::parse(r#"{"event":"ping"}"#).unwrap(), InboundMessage::Ping);

        let status = InboundMessage::parse(r#"{"event":"user:status","data":{"status":"away"}}"#)
            .unwrap();
        assert_eq!(status, InboundMessage::UserStatus {
            status: "away".into()
        });

        let task_id = TaskId::new();
        let typing = InboundMessage::parse(&format!(
            r#"{{"event":"task:typing","data":{{"taskId":"{task_id}","isTyping":true}}}}"#
        ))
        .unwrap();
        assert_eq!(typing, InboundMessage::TaskTyping {
            task_id,
            is_typing: true
        });
    }

    #[test]
    fn test_rejections_carry_codes() {
        let cases = [
            ("not json", "INVALID_MESSAGE"),
            (r#"{"event":"subscribe"}"#, "UNKNOWN_EVENT"),
            (r#"{"event":"user:status","data":{}}"#, "INVALID_DATA"),
            (r#"{"event":"task:typing","data":{"taskId":"nope"}}"#, "INVALID_DATA"),
        ];
        for (text, code) in cases {
            assert_eq!(InboundMessage::parse(text).unwrap_err().code(), code, "{text}");
        }

        let huge = format!(r#"{{"event":"ping","data":"{}"}}"#, "x".repeat(MAX_FRAME_SIZE));
        assert_eq!(InboundMessage::parse(&huge).unwrap_err().code(), "MESSAGE_TOO_LARGE");
    }
}
