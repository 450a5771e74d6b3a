//! Step-by-step replay of a completed trace.
//!
//! A trace is immutable once its engine returns; playback only moves a cursor
//! over it. Pausing, resuming and resetting never touch the steps themselves.

use crate::algorithms::karatsuba::KaratsubaStep;
use std::collections::BTreeSet;
use std::time::Duration;

/// A recorded step that can describe itself to a renderer.
pub trait TraceStep {
    fn label(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    len: usize,
    cursor: usize,
    running: bool,
    paused: bool,
    interval: Duration,
}

impl Playback {
    pub fn new(len: usize, interval: Duration) -> Self {
        Self {
            len,
            cursor: 0,
            running: false,
            paused: false,
            interval,
        }
    }

    pub fn start(&mut self) {
        self.cursor = 0;
        self.running = self.len > 0;
        self.paused = false;
    }

    /// Reveals the next step. Returns whether the cursor moved.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.paused {
            return false;
        }
        if self.cursor < self.len {
            self.cursor += 1;
        }
        if self.cursor >= self.len {
            self.running = false;
        }
        true
    }

    pub fn toggle_pause(&mut self) {
        if self.running {
            self.paused = !self.paused;
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.running = false;
        self.paused = false;
    }

    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// The step under the cursor, `None` once every step has been shown.
    pub fn current<'a, S>(&self, steps: &'a [S]) -> Option<&'a S> {
        steps.get(self.cursor)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_complete(&self) -> bool {
        self.len > 0 && self.cursor >= self.len
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Ids of the tree nodes touched by steps `0..=cursor`.
pub fn visited_nodes(steps: &[KaratsubaStep], cursor: usize) -> BTreeSet<usize> {
    steps
        .iter()
        .take(cursor.saturating_add(1))
        .map(|s| s.node_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::karatsuba::multiply_u64;

    #[test]
    fn test_playback_runs_to_completion() {
        let mut playback = Playback::new(3, Duration::from_millis(10));
        assert!(!playback.tick());
        playback.start();
        assert!(playback.is_running());
        assert!(playback.tick());
        assert!(playback.tick());
        assert_eq!(playback.current_index(), 2);
        assert!(playback.tick());
        assert!(playback.is_complete());
        assert!(!playback.is_running());
        assert!(!playback.tick());
        let steps = ["a", "b", "c"];
        assert_eq!(playback.current(&steps), None);
    }

    #[test]
    fn test_pause_holds_cursor() {
        let steps = ["a", "b"];
        let mut playback = Playback::new(steps.len(), Duration::from_millis(10));
        playback.start();
        playback.toggle_pause();
        assert!(!playback.tick());
        assert_eq!(playback.current(&steps), Some(&"a"));
        playback.toggle_pause();
        assert!(playback.tick());
        assert_eq!(playback.current(&steps), Some(&"b"));
        playback.reset();
        assert_eq!(playback.current_index(), 0);
        assert!(!playback.is_running());
        assert!(!playback.is_complete());
    }

    #[test]
    fn test_empty_trace_never_runs() {
        let mut playback = Playback::new(0, Duration::from_millis(10));
        playback.start();
        assert!(!playback.is_running());
        assert!(!playback.is_complete());
    }

    #[test]
    fn test_visited_nodes_follow_cursor() {
        let run = multiply_u64(12, 34);
        // split(0), base(1), base(2), base(3), combine(0)
        assert_eq!(visited_nodes(&run.steps, 0), BTreeSet::from([0]));
        assert_eq!(visited_nodes(&run.steps, 2), BTreeSet::from([0, 1, 2]));
        assert_eq!(
            visited_nodes(&run.steps, run.steps.len()),
            BTreeSet::from([0, 1, 2, 3])
        );
    }
}
