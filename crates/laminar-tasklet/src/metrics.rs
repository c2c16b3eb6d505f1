//! Lock-free per-tasklet counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-tasklet counters using atomics, readable from the scheduler thread
/// while the tasklet runs elsewhere.
#[derive(Debug, Default)]
pub struct TaskletMetrics {
    /// Total `invoke()` calls.
    pub invocations: AtomicU64,
    /// Invocations that reported progress or completion.
    pub progress_invocations: AtomicU64,
    /// Items drained from inbound edges into the inbox.
    pub items_received: AtomicU64,
    /// Items accepted by outbound edges.
    pub items_emitted: AtomicU64,
    /// Outbound edges closed.
    pub edges_closed: AtomicU64,
}

impl TaskletMetrics {
    /// Records one invocation.
    pub fn record_invocation(&self, made_progress: bool) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        if made_progress {
            self.progress_invocations.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records items drained into the inbox.
    pub fn record_received(&self, items: u64) {
        self.items_received.fetch_add(items, Ordering::Relaxed);
    }

    /// Records one item accepted downstream.
    pub fn record_emitted(&self) {
        self.items_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one outbound edge closed.
    pub fn record_closed(&self) {
        self.edges_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a snapshot of the current counters.
    #[must_use]
    pub fn snapshot(&self) -> TaskletMetricsSnapshot {
        TaskletMetricsSnapshot {
            invocations: self.invocations.load(Ordering::Relaxed),
            progress_invocations: self.progress_invocations.load(Ordering::Relaxed),
            items_received: self.items_received.load(Ordering::Relaxed),
            items_emitted: self.items_emitted.load(Ordering::Relaxed),
            edges_closed: self.edges_closed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of tasklet metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskletMetricsSnapshot {
    /// Total invocations.
    pub invocations: u64,
    /// Invocations with progress.
    pub progress_invocations: u64,
    /// Items received.
    pub items_received: u64,
    /// Items emitted.
    pub items_emitted: u64,
    /// Edges closed.
    pub edges_closed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let metrics = TaskletMetrics::default();
        metrics.record_invocation(true);
        metrics.record_invocation(false);
        metrics.record_received(5);
        metrics.record_emitted();
        metrics.record_emitted();
        metrics.record_closed();

        let snap = metrics.snapshot();
        assert_eq!(snap.invocations, 2);
        assert_eq!(snap.progress_invocations, 1);
        assert_eq!(snap.items_received, 5);
        assert_eq!(snap.items_emitted, 2);
        assert_eq!(snap.edges_closed, 1);
    }
}
