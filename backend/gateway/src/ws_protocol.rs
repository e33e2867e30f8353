//! WebSocket Protocol for the TruthLens Gateway.
//!
//! Clients send protocol messages as JSON text frames, optionally tagged with
//! an `id` that is echoed on the matching reply frame.

use serde::{Deserialize, Serialize};

use truthlens_core::{Message, Reply};

/// Client -> Server: one protocol message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub message: Message,
}

/// Server -> Client frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsFrame {
    /// The coordinator's reply to a request
    Reply {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        reply: Reply,
    },
    /// A message relayed to every listening context
    Relay { message: Message },
    /// The frame could not be parsed or routed
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        message: String,
    },
}
