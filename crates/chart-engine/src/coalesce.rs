// File: crates/chart-engine/src/coalesce.rs
// Summary: Trailing-edge event coalescing keyed by intent; caller-driven clock, no timers or threads.

use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Default coalescing window, about one frame at 60 Hz.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(16);

#[derive(Debug)]
struct Pending<K, A> {
    key: K,
    args: A,
    deadline: Instant,
}

/// Collapses bursts of calls per key into one trailing call.
///
/// `schedule` records the latest arguments for a key and, if nothing is
/// pending for it yet, sets a deadline `window` from `now`. `poll` fires
/// every key whose deadline has passed with its most recent arguments.
/// Cancelled or dropped entries are never invoked.
#[derive(Debug)]
pub struct EventCoalescer<K, A> {
    pending: Vec<Pending<K, A>>,
}

impl<K: PartialEq + Copy + Debug, A> EventCoalescer<K, A> {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    pub fn schedule(&mut self, key: K, args: A, window: Duration, now: Instant) {
        if let Some(p) = self.pending.iter_mut().find(|p| p.key == key) {
            p.args = args;
            tracing::trace!(?key, "coalesced");
            return;
        }
        tracing::trace!(?key, window_ms = window.as_millis() as u64, "scheduled");
        self.pending.push(Pending { key, args, deadline: now + window });
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|p| p.key == key)
    }

    /// Earliest deadline among pending keys, for the host's timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Fire every due entry in deadline order; returns how many fired.
    pub fn poll(&mut self, now: Instant, mut fire: impl FnMut(K, A)) -> usize {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].deadline <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| p.deadline);
        let fired = due.len();
        for p in due {
            tracing::trace!(key = ?p.key, "flushed");
            fire(p.key, p.args);
        }
        fired
    }

    /// Drop the pending call for `key` without running it.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.key != key);
        let removed = self.pending.len() != before;
        if removed {
            tracing::trace!(?key, "cancelled");
        }
        removed
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            tracing::trace!(count = self.pending.len(), "cancelled all");
        }
        self.pending.clear();
    }
}

impl<K: PartialEq + Copy + Debug, A> Default for EventCoalescer<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Key {
        Hover,
        Zoom,
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_collapses_to_latest_call() {
        let t0 = Instant::now();
        let mut c = EventCoalescer::new();
        for i in 1..=5u64 {
            c.schedule(Key::Hover, i, DEFAULT_WINDOW, t0 + ms(i * 2));
        }
        let mut calls = Vec::new();
        assert_eq!(c.poll(t0 + ms(10), |_, a| calls.push(a)), 0);
        assert_eq!(c.poll(t0 + ms(18), |_, a| calls.push(a)), 1);
        assert_eq!(calls, vec![5]);
        assert_eq!(c.poll(t0 + ms(100), |_, a| calls.push(a)), 0);
    }

    #[test]
    fn keys_are_independent() {
        let t0 = Instant::now();
        let mut c = EventCoalescer::new();
        c.schedule(Key::Zoom, "z", DEFAULT_WINDOW, t0);
        c.schedule(Key::Hover, "h", DEFAULT_WINDOW, t0 + ms(8));
        assert_eq!(c.next_deadline(), Some(t0 + ms(16)));

        let mut fired = Vec::new();
        c.poll(t0 + ms(16), |k, a| fired.push((k, a)));
        assert_eq!(fired, vec![(Key::Zoom, "z")]);
        assert!(c.is_pending(Key::Hover));
    }

    #[test]
    fn cancel_prevents_invocation() {
        let t0 = Instant::now();
        let mut c = EventCoalescer::new();
        c.schedule(Key::Hover, 1, DEFAULT_WINDOW, t0);
        c.schedule(Key::Zoom, 2, DEFAULT_WINDOW, t0);
        assert!(c.cancel(Key::Hover));
        assert!(!c.cancel(Key::Hover));
        c.cancel_all();
        let mut n = 0;
        c.poll(t0 + ms(1_000), |_, _| n += 1);
        assert_eq!(n, 0);
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn new_window_starts_after_flush() {
        let t0 = Instant::now();
        let mut c = EventCoalescer::new();
        c.schedule(Key::Hover, 1, DEFAULT_WINDOW, t0);
        c.poll(t0 + ms(16), |_, _| {});
        c.schedule(Key::Hover, 2, DEFAULT_WINDOW, t0 + ms(20));
        assert_eq!(c.next_deadline(), Some(t0 + ms(36)));
    }
}
