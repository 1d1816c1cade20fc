//! Cancellable delayed events
//!
//! Staged reveals and popups are queued here instead of as fire-and-forget
//! timers. The owner drains due events from its frame/timer callback and calls
//! `cancel_all` on teardown, after which nothing fires.

use serde::{Deserialize, Serialize};

/// Handle for a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Task<E> {
    id: TaskId,
    due_ms: f64,
    event: E,
}

/// Queue of events due at absolute times (ms on the owner's clock)
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    tasks: Vec<Task<E>>,
    next_id: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Queue `event` to fire `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, event: E) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            due_ms: now_ms + delay_ms.max(0.0),
            event,
        });
        id
    }

    /// Drop one pending event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Drop everything (owner teardown)
    pub fn cancel_all(&mut self) {
        if !self.tasks.is_empty() {
            log::debug!("Cancelling {} pending tasks", self.tasks.len());
        }
        self.tasks.clear();
    }

    /// Remove and return events due at `now_ms`, earliest first (ties in
    /// scheduling order)
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<E> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due_ms <= now_ms);
        self.tasks = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)));
        due.into_iter().map(|t| t.event).collect()
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Due time of the earliest pending event
    pub fn next_due(&self) -> Option<f64> {
        self.tasks.iter().map(|t| t.due_ms).min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(0.0, 300.0, "c");
        s.schedule(0.0, 100.0, "a");
        s.schedule(0.0, 100.0, "b");
        assert!(s.drain_due(50.0).is_empty());
        assert_eq!(s.next_due(), Some(100.0));
        assert_eq!(s.drain_due(150.0), vec!["a", "b"]);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.drain_due(1000.0), vec!["c"]);
        assert!(s.is_idle());
    }

    #[test]
    fn test_cancel_one() {
        let mut s = Scheduler::new();
        let a = s.schedule(0.0, 10.0, 1);
        s.schedule(0.0, 20.0, 2);
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert_eq!(s.drain_due(100.0), vec![2]);
    }

    #[test]
    fn test_cancel_all_on_teardown() {
        let mut s = Scheduler::new();
        s.schedule(0.0, 10.0, 1);
        s.schedule(5.0, 10.0, 2);
        s.cancel_all();
        assert!(s.drain_due(f64::MAX).is_empty());
    }

    #[test]
    fn test_negative_delay_fires_now() {
        let mut s = Scheduler::new();
        s.schedule(100.0, -50.0, ());
        assert_eq!(s.drain_due(100.0).len(), 1);
    }
}
