//! Premove queue
//!
//! Moves the player lines up while it is not their turn. The queue itself is
//! plain FIFO storage; the driver decides when to drain (one entry per turn
//! transition) and clears the rest when an application fails.

use std::collections::VecDeque;

use serde::Serialize;

/// One queued premove, squares in coordinate notation. Legality is only
/// checked at application time, against the position that actually arises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PremoveEntry {
    pub from: String,
    pub to: String,
    /// Piece occupying `from` at queue time; carried for display, never
    /// re-checked here.
    pub piece: String,
}

#[derive(Debug, Default)]
pub struct PremoveQueue {
    entries: VecDeque<PremoveEntry>,
}

impl PremoveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, entry: PremoveEntry) {
        self.entries.push_back(entry);
    }

    /// Take the oldest entry, if any.
    pub fn dequeue_one(&mut self) -> Option<PremoveEntry> {
        self.entries.pop_front()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot of the queue, oldest first.
    pub fn peek_all(&self) -> Vec<PremoveEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(from: &str, to: &str) -> PremoveEntry {
        PremoveEntry {
            from: from.to_string(),
            to: to.to_string(),
            piece: "wP".to_string(),
        }
    }

    #[test]
    fn test_dequeue_is_fifo() {
        let mut q = PremoveQueue::new();
        q.enqueue(entry("e2", "e4"));
        q.enqueue(entry("d2", "d4"));
        q.enqueue(entry("g1", "f3"));
        assert_eq!(q.len(), 3);
        assert_eq!(q.dequeue_one().map(|e| e.from), Some("e2".to_string()));
        assert_eq!(q.dequeue_one().map(|e| e.from), Some("d2".to_string()));
        assert_eq!(q.dequeue_one().map(|e| e.from), Some("g1".to_string()));
        assert_eq!(q.dequeue_one(), None);
    }

    #[test]
    fn test_peek_all_does_not_drain() {
        let mut q = PremoveQueue::new();
        q.enqueue(entry("e2", "e4"));
        q.enqueue(entry("d2", "d4"));
        let snapshot = q.peek_all();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].to, "e4");
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_clear_empties_the_queue() {
        let mut q = PremoveQueue::new();
        q.enqueue(entry("e2", "e4"));
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.dequeue_one(), None);
    }
}
