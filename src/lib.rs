pub mod config;
pub mod hype;
pub mod logging;
pub mod sentiment;
pub mod twitch;

use std::sync::Arc;

use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::hype::metrics::HypeMetrics;
use crate::hype::store::{MessageStore, ScoredMessage};
use crate::sentiment::SentimentAnalyzer;
use crate::twitch::client::{ChatConnector, WsConnector};
use crate::twitch::errors::SessionError;
use crate::twitch::manager::{SessionManager, SessionSettings, SessionState};

/// One channel's ingestion pipeline: session manager, sentiment scoring,
/// bounded store, and the read-only query surface over it.
///
/// `start` spawns the single ingestion task; `metrics` and `recent` are
/// non-blocking and safe to poll at any rate from anywhere. Once `start`
/// has returned, failures inside the loop are recovered or retried
/// internally and never surface here.
pub struct HypeTracker {
    config: Config,
    analyzer: Arc<dyn SentimentAnalyzer>,
    store: Arc<MessageStore>,
    session: Option<SessionHandle>,
    last_state: SessionState,
}

struct SessionHandle {
    stop_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl HypeTracker {
    pub fn new(config: Config, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        let store = Arc::new(MessageStore::new(config.store_capacity));
        Self {
            config,
            analyzer,
            store,
            session: None,
            last_state: SessionState::Disconnected,
        }
    }

    /// Connects to the configured gateway and starts ingesting `channel`.
    pub fn start(&mut self, channel: &str) -> Result<(), SessionError> {
        let connector = Arc::new(WsConnector::new(&self.config.server_url)?);
        self.start_with_connector(channel, connector)
    }

    /// Same as [`start`](Self::start) with a caller-supplied connector.
    pub fn start_with_connector(
        &mut self,
        channel: &str,
        connector: Arc<dyn ChatConnector>,
    ) -> Result<(), SessionError> {
        if self.session.is_some() {
            return Err(SessionError::AlreadyRunning);
        }

        let settings = SessionSettings {
            channel: channel.trim_start_matches('#').to_lowercase(),
            nickname: self.config.nickname.clone(),
            idle_timeout: self.config.idle_timeout(),
            reconnect_delay: self.config.reconnect_delay(),
            settle_delay: self.config.auth_settle(),
        };

        let (stop_tx, stop_rx) = watch::channel(false);
        let (manager, state_rx) = SessionManager::new(
            settings,
            connector,
            Arc::clone(&self.analyzer),
            Arc::clone(&self.store),
            stop_rx,
        );
        let task = tokio::spawn(manager.run());
        self.session = Some(SessionHandle {
            stop_tx,
            state_rx,
            task,
        });
        Ok(())
    }

    /// Stops the session and waits for the ingestion task to wind down.
    /// Idempotent and safe to call from any state; an in-flight connection
    /// attempt is aborted rather than allowed to finish joining.
    pub async fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            let _ = session.stop_tx.send(true);
            let _ = session.task.await;
            self.last_state = *session.state_rx.borrow();
            info!("Session stopped");
        }
    }

    /// Rolling metrics over the configured trailing window, computed fresh
    /// per call.
    pub fn metrics(&self) -> HypeMetrics {
        HypeMetrics::compute(&self.store, self.config.metrics_window)
    }

    /// The `n` most recent scored messages, oldest first.
    pub fn recent(&self, n: usize) -> Vec<Arc<ScoredMessage>> {
        self.store.tail(n)
    }

    pub fn session_state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(|s| *s.state_rx.borrow())
            .unwrap_or(self.last_state)
    }

    /// A watch receiver over session state transitions, for callers that
    /// want to await a particular state instead of polling.
    pub fn watch_state(&self) -> Option<watch::Receiver<SessionState>> {
        self.session.as_ref().map(|s| s.state_rx.clone())
    }

    pub fn store(&self) -> Arc<MessageStore> {
        Arc::clone(&self.store)
    }
}
