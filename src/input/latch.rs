//! Frame synchronized down / pressed tracking
//!
//! Hardware samples may arrive at any time between two frames, but application
//! code must see one consistent answer for the whole frame. The latch keeps the
//! most recent raw sample per key and only folds it into the queryable state
//! when [`InputLatch::advance`] runs at the start of a polling cycle.
//!
//! ```text
//!            sample = down                    sample = down
//!   ┌────┐ ──────────────────► ┌──────┐ ────────────────────► (pressed = false)
//!   │ UP │                     │ DOWN │
//!   └────┘ ◄────────────────── └──────┘
//!            sample = up         (pressed = true on entry)
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Queryable state of one tracked input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatchEntry {
    /// Level state from the most recent sample
    pub down: bool,
    /// True only during the cycle in which `down` went from false to true
    pub pressed: bool,
}

#[derive(Debug, Clone)]
pub struct InputLatch<K> {
    entries: HashMap<K, LatchEntry>,
    samples: HashMap<K, bool>,
    cycle: u64,
}

impl<K> Default for InputLatch<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            samples: HashMap::new(),
            cycle: 0,
        }
    }
}

impl<K: Copy + Eq + Hash> InputLatch<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw hardware sample. It becomes visible at the next [`advance`](Self::advance).
    ///
    /// Only the last sample before an advance counts: a key pressed and
    /// released again between two advances never reads as pressed.
    pub fn record(&mut self, key: K, down: bool) {
        self.samples.insert(key, down);
    }

    /// Starts tracking a key that has never been sampled. It reads as up.
    pub fn track(&mut self, key: K) {
        self.entries.entry(key).or_default();
    }

    /// Runs one polling cycle over the recorded samples.
    pub fn advance(&mut self) {
        for key in self.samples.keys() {
            self.entries.entry(*key).or_default();
        }
        let mut newly_pressed = 0usize;
        for (key, entry) in self.entries.iter_mut() {
            let previous_down = entry.down;
            entry.down = self.samples.get(key).copied().unwrap_or(false);
            entry.pressed = entry.down && !previous_down;
            if entry.pressed {
                newly_pressed += 1;
            }
        }
        self.cycle += 1;
        if newly_pressed > 0 {
            debug!(
                "Latch cycle {}: {} newly pressed of {} tracked",
                self.cycle,
                newly_pressed,
                self.entries.len()
            );
        }
    }

    /// Runs one polling cycle, asking `sampler` for the current state of each
    /// key. Keys in `keys` that were not tracked yet start out as up.
    ///
    /// Samples taken this way replace anything stored with [`record`](Self::record).
    pub fn advance_with<I, F>(&mut self, keys: I, mut sampler: F)
    where
        I: IntoIterator<Item = K>,
        F: FnMut(K) -> bool,
    {
        for key in keys {
            let down = sampler(key);
            self.samples.insert(key, down);
        }
        self.advance();
    }

    pub fn is_down(&self, key: K) -> bool {
        self.entries.get(&key).is_some_and(|entry| entry.down)
    }

    pub fn was_pressed(&self, key: K) -> bool {
        self.entries.get(&key).is_some_and(|entry| entry.pressed)
    }

    pub fn entry(&self, key: K) -> LatchEntry {
        self.entries.get(&key).copied().unwrap_or_default()
    }

    pub fn any_pressed(&self) -> bool {
        self.entries.values().any(|entry| entry.pressed)
    }

    pub fn pressed_keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.pressed)
            .map(|(key, _)| *key)
    }

    pub fn down_keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.down)
            .map(|(key, _)| *key)
    }

    /// Marks every key as released on the hardware side, e.g. after focus loss
    /// where the platform never delivers the matching key-up events.
    pub fn release_all(&mut self) {
        for down in self.samples.values_mut() {
            *down = false;
        }
    }

    /// Number of completed polling cycles
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn tracked(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_fires_once_per_transition() {
        let mut latch = InputLatch::new();
        let samples = [false, true, true, false, true];
        let mut pressed = Vec::new();
        let mut down = Vec::new();

        for sample in samples {
            latch.record('a', sample);
            latch.advance();
            pressed.push(latch.was_pressed('a'));
            down.push(latch.is_down('a'));
        }

        assert_eq!(pressed, [false, true, false, false, true]);
        assert_eq!(down, [false, true, true, false, true]);
    }

    #[test]
    fn tap_between_advances_is_not_seen() {
        let mut latch = InputLatch::new();
        latch.advance();
        latch.record('x', true);
        latch.record('x', false);
        latch.advance();
        assert!(!latch.was_pressed('x'));
        assert!(!latch.is_down('x'));
    }

    #[test]
    fn queries_do_not_consume_pressed() {
        let mut latch = InputLatch::new();
        latch.record(1u32, true);
        latch.advance();
        assert!(latch.was_pressed(1));
        assert!(latch.was_pressed(1));
        assert!(latch.any_pressed());
    }

    #[test]
    fn samples_only_apply_on_advance() {
        let mut latch = InputLatch::new();
        latch.record(5u32, true);
        assert!(!latch.is_down(5));
        latch.advance();
        assert!(latch.is_down(5));
        latch.record(5, false);
        assert!(latch.is_down(5));
        assert!(latch.was_pressed(5));
        latch.advance();
        assert!(!latch.is_down(5));
        assert!(!latch.was_pressed(5));
    }

    #[test]
    fn newly_tracked_key_starts_up() {
        let mut latch = InputLatch::new();
        latch.advance();
        latch.advance();
        latch.track(9u32);
        assert_eq!(latch.entry(9), LatchEntry::default());

        // First time the key shows up already held: that still counts as a press.
        latch.record(9, true);
        latch.advance();
        assert!(latch.was_pressed(9));
    }

    #[test]
    fn unknown_keys_read_up() {
        let latch: InputLatch<u32> = InputLatch::new();
        assert!(!latch.is_down(42));
        assert!(!latch.was_pressed(42));
    }

    #[test]
    fn poll_driven_sampling() {
        let mut latch = InputLatch::new();
        let held = [1u32, 3];
        latch.advance_with([1u32, 2, 3], |key| held.contains(&key));
        let mut pressed: Vec<u32> = latch.pressed_keys().collect();
        pressed.sort_unstable();
        assert_eq!(pressed, [1, 3]);
        assert_eq!(latch.tracked(), 3);

        latch.advance_with([1u32, 2, 3], |key| key == 2);
        assert!(latch.was_pressed(2));
        assert!(!latch.was_pressed(1));
        assert!(!latch.is_down(3));
    }

    #[test]
    fn release_all_lifts_keys_next_cycle() {
        let mut latch = InputLatch::new();
        latch.record(1u32, true);
        latch.record(2u32, true);
        latch.advance();
        latch.release_all();
        latch.advance();
        assert_eq!(latch.down_keys().count(), 0);
        assert_eq!(latch.cycle(), 2);
    }
}
