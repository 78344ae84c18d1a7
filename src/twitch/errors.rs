use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Connection handshake failed: {0}")]
    Handshake(String),

    #[error("Session is already running")]
    AlreadyRunning,
}
