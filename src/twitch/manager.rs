use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use crate::hype::store::{MessageStore, ScoredMessage};
use crate::sentiment::{SentimentAnalyzer, SentimentResult};

use super::client::{ChatConnector, ChatTransport};
use super::errors::SessionError;
use super::parser::{self, LineOutcome};

/// Fixed anonymous credential; the gateway grants read-only access for it.
pub const ANONYMOUS_PASS: &str = "SCHMOOPIIE";
pub const KEEPALIVE_PROBE: &str = "PING :tmi.twitch.tv";
const PONG_REPLY: &str = "PONG :tmi.twitch.tv";

/// Connection lifecycle. `Stopped` is terminal and reached only through an
/// explicit stop request; everything else cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Authenticating,
    Joined,
    Reconnecting,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub channel: String,
    pub nickname: String,
    pub idle_timeout: Duration,
    pub reconnect_delay: Duration,
    pub settle_delay: Duration,
}

/// Owns the connect-read-dispatch loop for one channel. Sole writer of the
/// message store; readers go through the store's snapshot operations.
pub struct SessionManager {
    settings: SessionSettings,
    connector: Arc<dyn ChatConnector>,
    analyzer: Arc<dyn SentimentAnalyzer>,
    store: Arc<MessageStore>,
    state_tx: watch::Sender<SessionState>,
    stop_rx: watch::Receiver<bool>,
}

enum SessionOutcome {
    Stopped,
    Disconnected,
}

impl SessionManager {
    pub fn new(
        settings: SessionSettings,
        connector: Arc<dyn ChatConnector>,
        analyzer: Arc<dyn SentimentAnalyzer>,
        store: Arc<MessageStore>,
        stop_rx: watch::Receiver<bool>,
    ) -> (Self, watch::Receiver<SessionState>) {
        let (state_tx, state_rx) = watch::channel(SessionState::Disconnected);
        let manager = Self {
            settings,
            connector,
            analyzer,
            store,
            state_tx,
            stop_rx,
        };
        (manager, state_rx)
    }

    /// Runs until stopped. Transport failures and remote disconnects cycle
    /// through `Reconnecting` with a fixed delay; nothing inside the loop
    /// escapes as an error.
    pub async fn run(self) {
        loop {
            if self.stop_requested() {
                break;
            }
            self.set_state(SessionState::Connecting);
            info!("Connecting to chat endpoint for #{}", self.settings.channel);

            let connected = tokio::select! {
                result = self.connector.connect() => Some(result),
                _ = self.stopped() => None,
            };
            match connected {
                None => break,
                Some(Ok(transport)) => match self.drive_session(transport).await {
                    SessionOutcome::Stopped => break,
                    SessionOutcome::Disconnected => {}
                },
                Some(Err(e)) => {
                    error!("Connection attempt failed: {}", e);
                }
            }

            if self.stop_requested() {
                break;
            }
            self.set_state(SessionState::Reconnecting);
            warn!(
                "Disconnected from #{}, retrying in {:?}",
                self.settings.channel, self.settings.reconnect_delay
            );
            tokio::select! {
                _ = sleep(self.settings.reconnect_delay) => {}
                _ = self.stopped() => break,
            }
        }
        self.set_state(SessionState::Stopped);
        info!("Session for #{} stopped", self.settings.channel);
    }

    async fn drive_session(&self, mut transport: Box<dyn ChatTransport>) -> SessionOutcome {
        self.set_state(SessionState::Authenticating);

        // Anonymous handshake. The gateway may never acknowledge it, so a
        // short settle delay stands in for an ack before joining.
        let nickname = &self.settings.nickname;
        let handshake = [
            format!("PASS {}", ANONYMOUS_PASS),
            format!("NICK {}", nickname),
            format!("USER {0} 8 * :{0}", nickname),
        ];
        for line in &handshake {
            if let Err(e) = transport.send_line(line).await {
                error!("Handshake send failed: {}", e);
                return SessionOutcome::Disconnected;
            }
        }

        tokio::select! {
            _ = sleep(self.settings.settle_delay) => {}
            _ = self.stopped() => return SessionOutcome::Stopped,
        }

        // Join confirmation is not awaited either; lines arriving before it
        // are consumed on a best-effort basis.
        if let Err(e) = transport
            .send_line(&format!("JOIN #{}", self.settings.channel))
            .await
        {
            error!("Channel join send failed: {}", e);
            return SessionOutcome::Disconnected;
        }
        self.set_state(SessionState::Joined);
        info!("Joined #{}", self.settings.channel);

        loop {
            tokio::select! {
                read = timeout(self.settings.idle_timeout, transport.next_line()) => match read {
                    Ok(Ok(Some(line))) => {
                        if let Err(e) = self.dispatch(transport.as_mut(), &line).await {
                            error!("Transport error while handling line: {}", e);
                            return SessionOutcome::Disconnected;
                        }
                    }
                    Ok(Ok(None)) => {
                        warn!("Connection closed by remote");
                        return SessionOutcome::Disconnected;
                    }
                    Ok(Err(e)) => {
                        error!("Read error: {}", e);
                        return SessionOutcome::Disconnected;
                    }
                    Err(_) => {
                        // Silence is not failure; nudge the connection.
                        debug!(
                            "No traffic for {:?}, sending keep-alive probe",
                            self.settings.idle_timeout
                        );
                        if let Err(e) = transport.send_line(KEEPALIVE_PROBE).await {
                            error!("Keep-alive probe failed: {}", e);
                            return SessionOutcome::Disconnected;
                        }
                    }
                },
                _ = self.stopped() => return SessionOutcome::Stopped,
            }
        }
    }

    /// Handles one raw line. A parse failure only costs that line; a scorer
    /// failure only costs the scores, never the message.
    async fn dispatch(
        &self,
        transport: &mut dyn ChatTransport,
        line: &str,
    ) -> Result<(), SessionError> {
        match parser::parse(line) {
            LineOutcome::KeepAlive => {
                debug!("Keep-alive from server");
                transport.send_line(PONG_REPLY).await?;
            }
            LineOutcome::Chat(event) => {
                let sentiment = match self.analyzer.polarity_scores(&event.text) {
                    Ok(scores) => SentimentResult::from_scores(scores),
                    Err(e) => {
                        warn!("Sentiment analysis failed, storing as neutral: {}", e);
                        SentimentResult::neutral()
                    }
                };
                debug!(
                    "[{}] {}: {} ({:+.2})",
                    event.channel, event.username, event.text, sentiment.scores.compound
                );
                self.store.append(ScoredMessage { event, sentiment });
            }
            LineOutcome::Unparseable => {
                debug!("Discarding unparseable line: {}", line);
            }
        }
        Ok(())
    }

    fn set_state(&self, next: SessionState) {
        let prev = self.state_tx.send_replace(next);
        if prev != next {
            info!("Session state: {:?} -> {:?}", prev, next);
        }
    }

    fn stop_requested(&self) -> bool {
        *self.stop_rx.borrow()
    }

    /// Resolves once a stop has been requested. Selected against every
    /// suspension point so shutdown never waits out a full idle timeout.
    async fn stopped(&self) {
        let mut stop_rx = self.stop_rx.clone();
        // A dropped sender also means shutdown.
        let _ = stop_rx.wait_for(|stopped| *stopped).await;
    }
}
