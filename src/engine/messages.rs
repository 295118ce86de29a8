use serde::{Deserialize, Serialize};

/// Server -> client record, sent as a JSON text frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Interviewer question to answer with one audio payload
    Question { text: String },
    /// Progress notice; no answer expected
    Status { text: String },
    /// Terminal error; the connection closes afterwards
    Error { text: String },
    /// Closing notice after a completed interview
    ThankYou { text: String },
}

impl ServerMessage {
    pub fn question(text: impl Into<String>) -> Self {
        ServerMessage::Question { text: text.into() }
    }

    pub fn status(text: impl Into<String>) -> Self {
        ServerMessage::Status { text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        ServerMessage::Error { text: text.into() }
    }

    pub fn thank_you(text: impl Into<String>) -> Self {
        ServerMessage::ThankYou { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            ServerMessage::Question { text }
            | ServerMessage::Status { text }
            | ServerMessage::Error { text }
            | ServerMessage::ThankYou { text } => text,
        }
    }
}

/// Client -> server payload as seen by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// One complete candidate answer
    Audio(Vec<u8>),
    /// Text frames are not part of the protocol; they are ignored
    Text(String),
    /// Client asked to close
    Close,
}
