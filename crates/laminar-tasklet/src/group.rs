//! Priority-ordered groups of inbound edges.
//!
//! Inbound edges are partitioned by priority (lower value first). Groups are
//! handed out one at a time, and the next group is only requested once every
//! edge of the current group has been exhausted. This models inputs that must
//! fully arrive before others are read, e.g. a broadcast side input that has
//! to be complete before the main input is consumed.

use std::collections::{BTreeMap, VecDeque};

use crate::cursor::CircularCursor;

/// FIFO of priority groups, each wrapped in a [`CircularCursor`].
#[derive(Debug)]
pub struct PriorityGroupQueue<E> {
    groups: VecDeque<(i32, CircularCursor<E>)>,
}

impl<E> PriorityGroupQueue<E> {
    /// Partitions `items` by `priority_of`, ordered ascending.
    ///
    /// Items sharing a priority keep their original relative order inside
    /// the group.
    pub fn new<I, F>(items: I, priority_of: F) -> Self
    where
        I: IntoIterator<Item = E>,
        F: Fn(&E) -> i32,
    {
        let mut by_priority: BTreeMap<i32, Vec<E>> = BTreeMap::new();
        for item in items {
            by_priority.entry(priority_of(&item)).or_default().push(item);
        }
        let groups = by_priority
            .into_iter()
            .map(|(priority, group)| (priority, CircularCursor::new(group)))
            .collect();
        Self { groups }
    }

    /// Removes and returns the next group's cursor with its priority.
    ///
    /// Returns `None` once all groups have been handed out.
    pub fn pop_next(&mut self) -> Option<(i32, CircularCursor<E>)> {
        self.groups.pop_front()
    }

    /// Number of groups not yet handed out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether every group has been handed out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
