pub mod client;
pub mod errors;
pub mod manager;
pub mod models;
pub mod parser;

pub use client::{ChatConnector, ChatTransport, WsConnector};
pub use errors::SessionError;
pub use manager::{SessionManager, SessionSettings, SessionState};
pub use models::ChatEvent;
pub use parser::LineOutcome;
