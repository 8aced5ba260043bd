// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-scope timer stacks and counters.

use crate::key::Key;
use crate::sys::Instant;
use std::collections::HashMap;

/// Timers and counters of one garden. Never shared between gardens.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tracker {
    timers: HashMap<Key, Vec<Instant>>,
    counters: HashMap<Key, u64>,
}

impl Tracker {
    /// Pushes a start instant. Overlapping timers under one key nest.
    pub(crate) fn start(&mut self, key: Key, at: Instant) {
        self.timers.entry(key).or_default().push(at);
    }

    /// Pops the most recent start instant for `key`.
    pub(crate) fn stop(&mut self, key: &Key) -> Option<Instant> {
        self.timers.get_mut(key)?.pop()
    }

    pub(crate) fn pending(&self, key: &Key) -> usize {
        self.timers.get(key).map_or(0, Vec::len)
    }

    /// Increments the counter for `key`, returning the new count.
    pub(crate) fn increment(&mut self, key: Key) -> u64 {
        let count = self.counters.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    pub(crate) fn reset(&mut self, key: Key) {
        self.counters.insert(key, 0);
    }

    pub(crate) fn count(&self, key: &Key) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Symbol;
    use crate::sys::Duration;

    #[test]
    fn timers_are_lifo() {
        let mut tracker = Tracker::default();
        let first = Instant::now();
        let second = first + Duration::from_millis(5);
        tracker.start(Key::Unnamed, first);
        tracker.start(Key::Unnamed, second);
        assert_eq!(tracker.pending(&Key::Unnamed), 2);
        assert_eq!(tracker.stop(&Key::Unnamed), Some(second));
        assert_eq!(tracker.stop(&Key::Unnamed), Some(first));
        assert_eq!(tracker.stop(&Key::Unnamed), None);
        assert_eq!(tracker.stop(&Key::from("never")), None);
    }

    #[test]
    fn counters_by_key() {
        let mut tracker = Tracker::default();
        let symbol = Symbol::new("count");
        assert_eq!(tracker.increment(Key::from("count")), 1);
        assert_eq!(tracker.increment(Key::from(&symbol)), 1);
        assert_eq!(tracker.increment(Key::from(&symbol)), 2);
        assert_eq!(tracker.count(&Key::from("count")), 1);
        tracker.reset(Key::from(&symbol));
        assert_eq!(tracker.count(&Key::from(&symbol)), 0);
        assert_eq!(tracker.increment(Key::from(symbol)), 1);
        assert_eq!(tracker.count(&Key::Unnamed), 0);
    }
}
