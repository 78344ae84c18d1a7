use chrono::{DateTime, Utc};

/// A single chat message as decoded off the wire. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEvent {
    pub timestamp: DateTime<Utc>,
    pub channel: String,
    pub username: String,
    pub text: String,
}
