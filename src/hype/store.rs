use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::sentiment::SentimentResult;
use crate::twitch::models::ChatEvent;

pub const DEFAULT_CAPACITY: usize = 1000;

/// A chat event plus its sentiment, the unit the store holds. Immutable
/// once appended, which is what makes lock-free reads of old snapshots safe.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMessage {
    pub event: ChatEvent,
    pub sentiment: SentimentResult,
}

/// Insertion-ordered, capacity-bounded message buffer.
///
/// Single writer (the session manager's ingestion path), any number of
/// concurrent readers. At capacity the oldest entry is evicted; that is
/// normal operation, never an error. Entries are shared out as `Arc`s, so a
/// snapshot stays valid no matter what the live store does afterwards.
pub struct MessageStore {
    entries: RwLock<VecDeque<Arc<ScoredMessage>>>,
    capacity: usize,
}

impl MessageStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Appends, then evicts the oldest entry if over capacity.
    pub fn append(&self, msg: ScoredMessage) {
        let mut entries = self.entries.write();
        entries.push_back(Arc::new(msg));
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Point-in-time copy of the whole store, oldest first. Later appends
    /// never show up in a snapshot already taken.
    pub fn snapshot(&self) -> Vec<Arc<ScoredMessage>> {
        self.entries.read().iter().cloned().collect()
    }

    /// The `n` most recent entries in insertion order, clamped to the
    /// current length.
    pub fn tail(&self, n: usize) -> Vec<Arc<ScoredMessage>> {
        let entries = self.entries.read();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{PolarityScores, SentimentResult};
    use chrono::Utc;

    fn message(n: usize) -> ScoredMessage {
        ScoredMessage {
            event: ChatEvent {
                timestamp: Utc::now(),
                channel: "test".to_string(),
                username: format!("user{}", n),
                text: format!("message {}", n),
            },
            sentiment: SentimentResult::from_scores(PolarityScores {
                compound: 0.0,
                positive: 0.0,
                negative: 0.0,
                neutral: 1.0,
            }),
        }
    }

    #[test]
    fn append_within_capacity_keeps_everything() {
        let store = MessageStore::new(10);
        for n in 0..5 {
            store.append(message(n));
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn eviction_keeps_the_most_recent_in_order() {
        let store = MessageStore::new(3);
        for n in 0..10 {
            store.append(message(n));
        }
        assert_eq!(store.len(), 3);
        let names: Vec<_> = store
            .snapshot()
            .iter()
            .map(|m| m.event.username.clone())
            .collect();
        assert_eq!(names, vec!["user7", "user8", "user9"]);
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let store = MessageStore::new(4);
        for n in 0..100 {
            store.append(message(n));
            assert!(store.len() <= 4);
        }
    }

    #[test]
    fn snapshot_is_isolated_from_later_appends() {
        let store = MessageStore::new(10);
        store.append(message(0));
        store.append(message(1));
        let snapshot = store.snapshot();
        for n in 2..8 {
            store.append(message(n));
        }
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].event.username, "user1");
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn tail_clamps_to_length() {
        let store = MessageStore::new(10);
        for n in 0..4 {
            store.append(message(n));
        }
        assert_eq!(store.tail(100).len(), 4);
        let last_two: Vec<_> = store
            .tail(2)
            .iter()
            .map(|m| m.event.username.clone())
            .collect();
        assert_eq!(last_two, vec!["user2", "user3"]);
    }

    #[test]
    fn tail_zero_is_empty() {
        let store = MessageStore::new(10);
        store.append(message(0));
        assert!(store.tail(0).is_empty());
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let store = MessageStore::new(0);
        store.append(message(0));
        store.append(message(1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].event.username, "user1");
    }
}
