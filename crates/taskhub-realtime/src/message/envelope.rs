//! `{"event": ..., "data": ...}` framing shared by both directions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single text frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name.
    pub event: String,
    /// Event body; `null` when absent.
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Wrap an already-encoded body.
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Encode `body` and wrap it.
    pub fn encode<T: Serialize>(event: &str, body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event, serde_json::to_value(body)?))
    }

    /// Serialize the frame to text.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
