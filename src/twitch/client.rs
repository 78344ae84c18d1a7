use std::collections::VecDeque;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use log::debug;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};
use url::Url;

use super::errors::SessionError;

/// One live connection to the chat endpoint, line oriented. The session
/// manager only ever holds one of these at a time.
#[async_trait]
pub trait ChatTransport: Send {
    async fn send_line(&mut self, line: &str) -> Result<(), SessionError>;

    /// Next protocol line, `Ok(None)` once the remote has closed.
    async fn next_line(&mut self) -> Result<Option<String>, SessionError>;
}

/// Factory for [`ChatTransport`] connections; the session manager calls it
/// once per connection attempt, so tests can script failures.
#[async_trait]
pub trait ChatConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn ChatTransport>, SessionError>;
}

/// Production connector: secure WebSocket to the configured IRC gateway.
pub struct WsConnector {
    endpoint: Url,
}

impl WsConnector {
    pub fn new(endpoint: &str) -> Result<Self, SessionError> {
        Url::parse(endpoint)
            .map(|endpoint| Self { endpoint })
            .map_err(|e| SessionError::Handshake(format!("Invalid endpoint {endpoint}: {e}")))
    }
}

#[async_trait]
impl ChatConnector for WsConnector {
    async fn connect(&self) -> Result<Box<dyn ChatTransport>, SessionError> {
        let tls = native_tls::TlsConnector::new()
            .map_err(|e| SessionError::Handshake(format!("TLS connector setup failed: {e}")))?;

        let (ws_stream, _) = connect_async_tls_with_config(
            self.endpoint.as_str(),
            None,
            false,
            Some(Connector::NativeTls(tls)),
        )
        .await
        .map_err(|e| SessionError::Transport(format!("WebSocket connection failed: {e}")))?;

        Ok(Box::new(WsTransport {
            stream: ws_stream,
            pending: VecDeque::new(),
        }))
    }
}

/// A WebSocket frame may carry several protocol lines; they are buffered
/// and handed out one at a time.
struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pending: VecDeque<String>,
}

#[async_trait]
impl ChatTransport for WsTransport {
    async fn send_line(&mut self, line: &str) -> Result<(), SessionError> {
        debug!(">> {}", line);
        self.stream
            .send(Message::Text(line.to_string()))
            .await
            .map_err(|e| SessionError::Transport(format!("Send failed: {e}")))
    }

    async fn next_line(&mut self) -> Result<Option<String>, SessionError> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Ok(Some(line));
            }
            match self.stream.next().await {
                Some(Ok(Message::Text(frame))) => {
                    for line in frame.lines().filter(|l| !l.trim().is_empty()) {
                        debug!("<< {}", line);
                        self.pending.push_back(line.to_string());
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    return Err(SessionError::Transport(format!("Read failed: {e}")));
                }
            }
        }
    }
}
