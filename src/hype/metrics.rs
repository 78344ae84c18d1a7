use std::collections::HashMap;

use crate::sentiment::SentimentLabel;

use super::store::MessageStore;

pub const DEFAULT_WINDOW: usize = 50;

/// Rolling aggregate over the most recent messages. Computed fresh on every
/// query; the window is a moving target, so nothing here is ever cached.
#[derive(Debug, Clone, PartialEq)]
pub struct HypeMetrics {
    /// Mean compound score over the window, rounded to 3 decimals.
    pub hype_score: f64,
    /// Entries actually used, at most the window size.
    pub message_count: usize,
    /// Per-label counts; labels absent from the window are omitted, so a
    /// missing key reads as zero.
    pub sentiment_breakdown: HashMap<SentimentLabel, usize>,
}

impl HypeMetrics {
    pub fn empty() -> Self {
        Self {
            hype_score: 0.0,
            message_count: 0,
            sentiment_breakdown: HashMap::new(),
        }
    }

    /// Aggregates the trailing `window_size` entries of the store. Pure
    /// read, O(window), safe to call at any rate from any task.
    pub fn compute(store: &MessageStore, window_size: usize) -> Self {
        let window = store.tail(window_size);
        if window.is_empty() {
            return Self::empty();
        }

        let sum: f64 = window.iter().map(|m| m.sentiment.scores.compound).sum();
        let mut sentiment_breakdown = HashMap::new();
        for msg in &window {
            *sentiment_breakdown.entry(msg.sentiment.label).or_insert(0) += 1;
        }

        Self {
            hype_score: round3(sum / window.len() as f64),
            message_count: window.len(),
            sentiment_breakdown,
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hype::store::ScoredMessage;
    use crate::sentiment::{PolarityScores, SentimentResult};
    use crate::twitch::models::ChatEvent;
    use chrono::Utc;

    fn scored(compound: f64) -> ScoredMessage {
        ScoredMessage {
            event: ChatEvent {
                timestamp: Utc::now(),
                channel: "test".to_string(),
                username: "user".to_string(),
                text: "text".to_string(),
            },
            sentiment: SentimentResult::from_scores(PolarityScores {
                compound,
                positive: 0.0,
                negative: 0.0,
                neutral: 1.0,
            }),
        }
    }

    #[test]
    fn empty_store_yields_zeroed_metrics() {
        let store = MessageStore::new(10);
        let metrics = HypeMetrics::compute(&store, DEFAULT_WINDOW);
        assert_eq!(metrics.hype_score, 0.0);
        assert_eq!(metrics.message_count, 0);
        assert!(metrics.sentiment_breakdown.is_empty());
    }

    #[test]
    fn hype_score_is_the_rounded_mean() {
        let store = MessageStore::new(10);
        store.append(scored(0.8));
        store.append(scored(-0.2));
        store.append(scored(0.0));
        let metrics = HypeMetrics::compute(&store, DEFAULT_WINDOW);
        assert_eq!(metrics.hype_score, 0.2);
        assert_eq!(metrics.message_count, 3);
        assert_eq!(
            metrics.sentiment_breakdown.get(&SentimentLabel::Positive),
            Some(&1)
        );
        assert_eq!(
            metrics.sentiment_breakdown.get(&SentimentLabel::Negative),
            Some(&1)
        );
        assert_eq!(
            metrics.sentiment_breakdown.get(&SentimentLabel::Neutral),
            Some(&1)
        );
    }

    #[test]
    fn rounding_is_three_decimals() {
        let store = MessageStore::new(10);
        store.append(scored(0.1));
        store.append(scored(0.2));
        store.append(scored(0.2));
        let metrics = HypeMetrics::compute(&store, DEFAULT_WINDOW);
        assert_eq!(metrics.hype_score, 0.167);
    }

    #[test]
    fn only_the_window_contributes() {
        let store = MessageStore::new(100);
        // 10 strongly negative messages that must fall outside the window.
        for _ in 0..10 {
            store.append(scored(-1.0));
        }
        for _ in 0..50 {
            store.append(scored(0.5));
        }
        let metrics = HypeMetrics::compute(&store, 50);
        assert_eq!(metrics.message_count, 50);
        assert_eq!(metrics.hype_score, 0.5);
        assert_eq!(
            metrics.sentiment_breakdown.get(&SentimentLabel::Negative),
            None
        );
    }

    #[test]
    fn absent_labels_are_omitted() {
        let store = MessageStore::new(10);
        store.append(scored(0.9));
        let metrics = HypeMetrics::compute(&store, DEFAULT_WINDOW);
        assert_eq!(metrics.sentiment_breakdown.len(), 1);
        assert!(!metrics
            .sentiment_breakdown
            .contains_key(&SentimentLabel::Neutral));
    }

    #[test]
    fn short_window_uses_what_is_there() {
        let store = MessageStore::new(10);
        store.append(scored(0.4));
        store.append(scored(0.6));
        let metrics = HypeMetrics::compute(&store, 50);
        assert_eq!(metrics.message_count, 2);
        assert_eq!(metrics.hype_score, 0.5);
    }
}
