use anyhow::Result;
use async_trait::async_trait;

use super::messages::{ClientMessage, ServerMessage};

/// One live, bidirectional client connection owned by a single session
#[async_trait]
pub trait InterviewConnection: Send {
    async fn send(&mut self, message: ServerMessage) -> Result<()>;

    /// Next client message; `None` once the connection is gone
    async fn recv(&mut self) -> Option<ClientMessage>;

    /// Close the connection. Errors are ignored; the peer may already be gone.
    async fn close(&mut self);
}
