use crate::types::{Envelope, Result};
use futures::SinkExt;
use futures::stream::SplitSink;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::RwLock;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

/// Connection lifecycle states, exactly one value at any instant.
///
/// `disconnected → connecting → connected → {disconnected, error}`, plus a
/// direct `connecting → error` edge for malformed endpoints. `Display` yields
/// the lowercase names a dashboard binds to directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Owns the single transport write handle and the connection state.
///
/// No other component holds the sink directly; the subscription registry and
/// heartbeat reach the wire only through [`ConnectionManager::send_envelope`].
pub struct ConnectionManager {
    ws_write: Arc<RwLock<Option<WsSink>>>,
    state: Arc<RwLock<ConnectionState>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            ws_write: Arc::new(RwLock::new(None)),
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
        }
    }

    /// Install the write sink after a successful handshake
    pub async fn set_writer(&self, writer: WsSink) {
        let mut ws = self.ws_write.write().await;
        *ws = Some(writer);
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// The single authoritative transition point for connection state.
    pub async fn transition(&self, next: ConnectionState) {
        let mut state = self.state.write().await;
        if *state != next {
            tracing::debug!("Connection state: {} -> {}", *state, next);
            *state = next;
        }
    }

    pub async fn is_connected(&self) -> bool {
        *self.state.read().await == ConnectionState::Connected
    }

    /// Serializes an envelope and writes it as one text frame.
    pub async fn send_envelope(&self, envelope: &Envelope) -> Result<()> {
        let json = serde_json::to_string(envelope)?;
        let message = Message::Text(json.into());

        let mut ws_guard = self.ws_write.write().await;
        match ws_guard.as_mut() {
            Some(ws) => {
                ws.send(message).await?;
                Ok(())
            }
            None => Err(crate::types::MonitorError::NotConnected),
        }
    }

    /// Closes the transport gracefully and drops the write handle.
    /// Best-effort: a close failure on a dead socket is only logged.
    pub async fn close(&self) {
        {
            let mut ws_guard = self.ws_write.write().await;
            if let Some(ws) = ws_guard.as_mut() {
                if let Err(e) = ws.close().await {
                    tracing::debug!("Error closing transport: {}", e);
                }
            }
            *ws_guard = None;
        }

        self.transition(ConnectionState::Disconnected).await;
    }

    /// Drops the write handle without the close handshake (used when tearing
    /// down a dead transport before dialing a new one)
    pub async fn clear_writer(&self) {
        let mut ws = self.ws_write.write().await;
        *ws = None;
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
