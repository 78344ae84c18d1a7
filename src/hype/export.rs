use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentLabel;

use super::store::ScoredMessage;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The serialization contract the presentation layer uses for bulk
/// load/replay of a store snapshot. The core never reads or writes files
/// with it; it only guarantees the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub timestamp: String,
    pub username: String,
    pub message: String,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub channel: String,
}

impl From<&ScoredMessage> for ExportRecord {
    fn from(msg: &ScoredMessage) -> Self {
        Self {
            timestamp: msg.event.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            username: msg.event.username.clone(),
            message: msg.event.text.clone(),
            sentiment_score: msg.sentiment.scores.compound,
            sentiment_label: msg.sentiment.label,
            channel: msg.event.channel.clone(),
        }
    }
}

/// Converts a store snapshot into export records, oldest first.
pub fn to_records(snapshot: &[Arc<ScoredMessage>]) -> Vec<ExportRecord> {
    snapshot.iter().map(|msg| ExportRecord::from(msg.as_ref())).collect()
}
