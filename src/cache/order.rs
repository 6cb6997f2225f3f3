//! Insertion Order Module
//!
//! Tracks the order in which keys were stored, for FIFO eviction.

use std::collections::BTreeMap;

// == Insertion Order ==
/// Tracks insertion order for FIFO eviction.
///
/// Every insertion receives a fresh, strictly increasing sequence number.
/// The smallest live sequence number is the oldest entry. Reads never
/// change a key's position.
#[derive(Debug)]
pub(crate) struct InsertionOrder<K> {
    /// Keys indexed by their insertion sequence number
    order: BTreeMap<u64, K>,
    /// Sequence number handed to the next insertion
    next_seq: u64,
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> InsertionOrder<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    // == Push Newest ==
    /// Appends a key at the newest position and returns its sequence number.
    pub fn push_newest(&mut self, key: K) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key);
        seq
    }

    // == Remove ==
    /// Removes the key recorded under `seq`, if any.
    pub fn remove(&mut self, seq: u64) -> Option<K> {
        self.order.remove(&seq)
    }

    // == Pop Oldest ==
    /// Removes and returns the oldest-inserted key.
    ///
    /// Returns None if the tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<(u64, K)> {
        self.order.pop_first()
    }

    // == Clear ==
    /// Forgets every tracked key. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    /// Iterates keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.values()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_new() {
        let order: InsertionOrder<&str> = InsertionOrder::new();
        assert_eq!(order.iter().next(), None);
    }

    #[test]
    fn test_push_assigns_increasing_seq() {
        let mut order = InsertionOrder::new();

        let a = order.push_newest("a");
        let b = order.push_newest("b");
        let c = order.push_newest("c");

        assert!(a < b && b < c);
        assert_eq!(order.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_pop_oldest_in_insertion_order() {
        let mut order = InsertionOrder::new();

        order.push_newest("key1");
        order.push_newest("key2");
        order.push_newest("key3");

        assert_eq!(order.pop_oldest().map(|(_, k)| k), Some("key1"));
        assert_eq!(order.pop_oldest().map(|(_, k)| k), Some("key2"));
        assert_eq!(order.iter().count(), 1);
    }

    #[test]
    fn test_pop_empty() {
        let mut order: InsertionOrder<u32> = InsertionOrder::new();
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_remove_from_middle() {
        let mut order = InsertionOrder::new();

        order.push_newest("a");
        let b = order.push_newest("b");
        order.push_newest("c");

        assert_eq!(order.remove(b), Some("b"));
        assert_eq!(order.remove(b), None);
        assert_eq!(order.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_reinsert_moves_to_newest() {
        let mut order = InsertionOrder::new();

        let a = order.push_newest("a");
        order.push_newest("b");

        // A re-inserted key is a fresh insertion, not an update in place
        order.remove(a);
        order.push_newest("a");

        assert_eq!(order.iter().copied().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_clear_keeps_sequence_monotonic() {
        let mut order = InsertionOrder::new();

        let first = order.push_newest(1);
        order.clear();
        let second = order.push_newest(2);

        assert_eq!(order.iter().count(), 1);
        assert!(second > first);
    }
}
