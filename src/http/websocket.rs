use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use tracing::debug;

use crate::engine::{ClientMessage, InterviewConnection, ServerMessage};

/// Engine connection over an axum WebSocket.
///
/// Binary frames carry audio answers; server messages go out as JSON text frames.
pub struct WsConnection {
    socket: WebSocket,
}

impl WsConnection {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

#[async_trait]
impl InterviewConnection for WsConnection {
    async fn send(&mut self, message: ServerMessage) -> Result<()> {
        let json = serde_json::to_string(&message)?;
        self.socket
            .send(Message::Text(json))
            .await
            .context("WebSocket send failed")
    }

    async fn recv(&mut self) -> Option<ClientMessage> {
        while let Some(frame) = self.socket.recv().await {
            match frame {
                Ok(Message::Binary(bytes)) => return Some(ClientMessage::Audio(bytes)),
                Ok(Message::Text(text)) => return Some(ClientMessage::Text(text)),
                Ok(Message::Close(_)) => return Some(ClientMessage::Close),
                // Answered by the transport
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Err(e) => {
                    debug!("WebSocket receive error: {}", e);
                    return None;
                }
            }
        }
        None
    }

    async fn close(&mut self) {
        if let Err(e) = self.socket.send(Message::Close(None)).await {
            debug!("WebSocket close failed: {}", e);
        }
    }
}
