//! WebSocket message DTOs for the class chat.

use serde::{Deserialize, Serialize};

use crate::domain::Message;

/// Frame sent from the hub to a client.
///
/// Serialized as `{"type": "message" | "error", "content": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum Envelope<'a> {
    Message(&'a Message),
    Error(&'a str),
}

impl Envelope<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Frame sent from a client to the hub
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub content: String,
}
