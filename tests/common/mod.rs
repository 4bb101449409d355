//! In-process WebSocket server harness for driving the client
//! deterministically: tests receive outbound frames, push inbound frames and
//! drop the socket at will.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};

const WAIT: Duration = Duration::from_secs(5);

/// Accepts WebSocket connections and hands each one to the test as a
/// [`ServerConn`] control handle.
pub struct TestServer {
    addr: SocketAddr,
    conn_rx: mpsc::UnboundedReceiver<ServerConn>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (conn_tx, conn_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let ws = match accept_async(stream).await {
                    Ok(ws) => ws,
                    Err(_) => continue,
                };
                if conn_tx.send(ServerConn::spawn(ws)).is_err() {
                    break;
                }
            }
        });

        Self { addr, conn_rx }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Next accepted connection, panicking if none arrives in time.
    pub async fn next_conn(&mut self) -> ServerConn {
        tokio::time::timeout(WAIT, self.conn_rx.recv())
            .await
            .expect("timed out waiting for a client connection")
            .expect("server accept loop ended")
    }

    /// Next accepted connection within `wait`, or `None`.
    pub async fn try_next_conn(&mut self, wait: Duration) -> Option<ServerConn> {
        tokio::time::timeout(wait, self.conn_rx.recv())
            .await
            .ok()
            .flatten()
    }
}

/// Accepts TCP connections and drops them before the WebSocket handshake,
/// so every dial fails. Used to count reconnect attempts.
pub struct RejectingServer {
    addr: SocketAddr,
    dial_rx: mpsc::UnboundedReceiver<()>,
}

impl RejectingServer {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (dial_tx, dial_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let _ = dial_tx.send(());
                drop(stream);
            }
        });

        Self { addr, dial_rx }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Number of dials observed within the window.
    pub async fn dials_within(&mut self, window: Duration) -> usize {
        let mut count = 0;
        let deadline = tokio::time::Instant::now() + window;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match tokio::time::timeout(remaining, self.dial_rx.recv()).await {
                Ok(Some(())) => count += 1,
                _ => return count,
            }
        }
    }
}

enum ServerCmd {
    Send(String),
    Close,
}

/// Server-side handle for one accepted connection.
pub struct ServerConn {
    frames_rx: mpsc::UnboundedReceiver<String>,
    cmd_tx: mpsc::UnboundedSender<ServerCmd>,
}

impl ServerConn {
    fn spawn(ws: WebSocketStream<TcpStream>) -> Self {
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let (mut sink, mut stream) = ws.split();
            loop {
                tokio::select! {
                    msg = stream.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            let _ = frames_tx.send(text.to_string());
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(_)) => break,
                    },
                    cmd = cmd_rx.recv() => match cmd {
                        Some(ServerCmd::Send(text)) => {
                            if sink.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        Some(ServerCmd::Close) | None => {
                            let _ = sink.close().await;
                            break;
                        }
                    },
                }
            }
        });

        Self { frames_rx, cmd_tx }
    }

    /// Push one inbound text frame to the client.
    pub fn send_text(&self, text: impl Into<String>) {
        let _ = self.cmd_tx.send(ServerCmd::Send(text.into()));
    }

    /// Push one inbound JSON frame to the client.
    pub fn send_json(&self, value: &serde_json::Value) {
        self.send_text(value.to_string());
    }

    /// Close the socket from the server side.
    pub fn close(&self) {
        let _ = self.cmd_tx.send(ServerCmd::Close);
    }

    /// Next frame the client sent, parsed as JSON. Panics on timeout.
    pub async fn recv_frame(&mut self) -> serde_json::Value {
        let text = tokio::time::timeout(WAIT, self.frames_rx.recv())
            .await
            .expect("timed out waiting for a client frame")
            .expect("connection task ended");
        serde_json::from_str(&text).expect("client sent non-JSON frame")
    }

    /// Next frame within `wait`, or `None` if the client stayed quiet.
    pub async fn try_recv_frame(&mut self, wait: Duration) -> Option<String> {
        tokio::time::timeout(wait, self.frames_rx.recv())
            .await
            .ok()
            .flatten()
    }
}
