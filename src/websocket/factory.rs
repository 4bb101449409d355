use crate::types::Result;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Factory for establishing WebSocket connections
pub struct WebSocketFactory;

impl WebSocketFactory {
    /// Dial the endpoint and perform the WebSocket handshake
    pub async fn create(url: &str) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>> {
        tracing::debug!("Creating WebSocket connection to: {}", url);
        let (stream, _response) = connect_async(url).await?;
        Ok(stream)
    }
}
