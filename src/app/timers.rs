//! Cancellable one-shot timers keyed by owner
//!
//! At most one outstanding timer per key: scheduling again replaces the
//! previous deadline, which is exactly debounce semantics. Timers only fire
//! when the owner drains them with the current clock.

use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerQueue<K: Ord + Copy> {
    deadlines: BTreeMap<K, Duration>,
}

impl<K: Ord + Copy> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            deadlines: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer for `key`, cancelling any pending one
    pub fn schedule(&mut self, key: K, deadline: Duration) {
        self.deadlines.insert(key, deadline);
    }

    pub fn cancel(&mut self, key: K) -> bool {
        self.deadlines.remove(&key).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    pub fn deadline(&self, key: K) -> Option<Duration> {
        self.deadlines.get(&key).copied()
    }

    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }

    /// Earliest deadline still armed
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadlines.values().min().copied()
    }

    /// Removes and returns every key due at `now`, earliest first
    pub fn drain_due(&mut self, now: Duration) -> Vec<K> {
        let mut due: Vec<(Duration, K)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        due.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        for (_, key) in &due {
            self.deadlines.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn reschedule_replaces_previous_deadline() {
        let mut timers = TimerQueue::new();
        timers.schedule('a', ms(800));
        timers.schedule('a', ms(1000));
        assert_eq!(timers.pending(), 1);
        assert!(timers.drain_due(ms(900)).is_empty());
        assert_eq!(timers.drain_due(ms(1000)), vec!['a']);
        assert!(timers.drain_due(ms(5000)).is_empty(), "one-shot");
    }

    #[test]
    fn keys_are_independent() {
        let mut timers = TimerQueue::new();
        timers.schedule('a', ms(800));
        timers.schedule('b', ms(300));
        assert!(timers.cancel('a'));
        assert!(!timers.cancel('a'));
        assert_eq!(timers.drain_due(ms(1000)), vec!['b']);
    }

    #[test]
    fn drains_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(1, ms(900));
        timers.schedule(2, ms(100));
        timers.schedule(3, ms(500));
        assert_eq!(timers.next_deadline(), Some(ms(100)));
        assert_eq!(timers.drain_due(ms(1000)), vec![2, 3, 1]);
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut timers = TimerQueue::new();
        timers.schedule(1, ms(10));
        timers.schedule(2, ms(20));
        timers.cancel_all();
        assert_eq!(timers.pending(), 0);
        assert_eq!(timers.deadline(1), None);
    }
}
