//! Per-ordinal staging queues between the processor and outbound edges.
//!
//! The processor emits into the [`Outbox`] without ever blocking. Each
//! ordinal has its own FIFO bounded by a high-water mark. The outbox never
//! refuses an item; crossing the mark is the signal for the processor to
//! stop emitting to that ordinal until the tasklet has flushed.
//!
//! Stream completion travels through the same queues as data in the form of
//! [`OutboxItem::Done`], so a downstream edge can never observe the end of
//! the stream before every item staged ahead of it.

use std::collections::VecDeque;

/// Element of an outbound staging queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboxItem<T> {
    /// A data item emitted by the processor.
    Data(T),
    /// End-of-stream marker; always the last element of its queue.
    Done,
}

/// Fixed set of bounded per-ordinal queues.
#[derive(Debug)]
pub struct Outbox<T> {
    queues: Vec<VecDeque<OutboxItem<T>>>,
    high_water_mark: usize,
}

impl<T> Outbox<T> {
    /// Creates an outbox with `queue_count` queues bounded by `high_water_mark`.
    ///
    /// # Panics
    ///
    /// Panics if `high_water_mark` is zero.
    #[must_use]
    pub fn new(queue_count: usize, high_water_mark: usize) -> Self {
        assert!(high_water_mark > 0, "high_water_mark must be > 0");
        Self {
            queues: (0..queue_count).map(|_| VecDeque::new()).collect(),
            high_water_mark,
        }
    }

    /// Stages `item` for the outbound edge with the given ordinal.
    ///
    /// Never refuses. Callers should check [`has_reached_limit`](Self::has_reached_limit)
    /// and yield once it returns true.
    ///
    /// # Panics
    ///
    /// Panics if `ordinal` is out of range.
    pub fn add(&mut self, ordinal: usize, item: T) {
        self.queue_mut(ordinal).push_back(OutboxItem::Data(item));
    }

    /// Whether the queue for `ordinal` is at or above the high-water mark.
    ///
    /// # Panics
    ///
    /// Panics if `ordinal` is out of range.
    #[must_use]
    pub fn has_reached_limit(&self, ordinal: usize) -> bool {
        self.queue(ordinal).len() >= self.high_water_mark
    }

    /// Items that can still be staged for `ordinal` before the mark is hit.
    ///
    /// # Panics
    ///
    /// Panics if `ordinal` is out of range.
    #[must_use]
    pub fn remaining_capacity(&self, ordinal: usize) -> usize {
        self.high_water_mark.saturating_sub(self.queue(ordinal).len())
    }

    /// Number of outbound queues.
    #[must_use]
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    /// Configured per-queue high-water mark.
    #[must_use]
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    /// Number of pending elements (including a pending `Done`) for `ordinal`.
    ///
    /// # Panics
    ///
    /// Panics if `ordinal` is out of range.
    #[must_use]
    pub fn pending(&self, ordinal: usize) -> usize {
        self.queue(ordinal).len()
    }

    /// Whether every queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    pub(crate) fn add_done(&mut self, ordinal: usize) {
        self.queue_mut(ordinal).push_back(OutboxItem::Done);
    }

    pub(crate) fn front(&self, ordinal: usize) -> Option<&OutboxItem<T>> {
        self.queue(ordinal).front()
    }

    pub(crate) fn pop_front(&mut self, ordinal: usize) -> Option<OutboxItem<T>> {
        self.queue_mut(ordinal).pop_front()
    }

    fn queue(&self, ordinal: usize) -> &VecDeque<OutboxItem<T>> {
        assert!(
            ordinal < self.queues.len(),
            "outbox ordinal {ordinal} >= queue count {}",
            self.queues.len()
        );
        &self.queues[ordinal]
    }

    fn queue_mut(&mut self, ordinal: usize) -> &mut VecDeque<OutboxItem<T>> {
        assert!(
            ordinal < self.queues.len(),
            "outbox ordinal {ordinal} >= queue count {}",
            self.queues.len()
        );
        &mut self.queues[ordinal]
    }
}

impl<T: Clone> Outbox<T> {
    /// Stages a copy of `item` on every ordinal.
    pub fn add_to_all(&mut self, item: &T) {
        for queue in &mut self.queues {
            queue.push_back(OutboxItem::Data(item.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_outbox() {
        let outbox: Outbox<u32> = Outbox::new(3, 8);
        assert_eq!(outbox.queue_count(), 3);
        assert_eq!(outbox.high_water_mark(), 8);
        assert!(outbox.is_empty());
        assert_eq!(outbox.remaining_capacity(2), 8);
    }

    #[test]
    fn test_add_keeps_order_per_ordinal() {
        let mut outbox = Outbox::new(2, 8);
        outbox.add(0, 1);
        outbox.add(1, 10);
        outbox.add(0, 2);

        assert_eq!(outbox.pop_front(0), Some(OutboxItem::Data(1)));
        assert_eq!(outbox.pop_front(0), Some(OutboxItem::Data(2)));
        assert_eq!(outbox.pop_front(0), None);
        assert_eq!(outbox.front(1), Some(&OutboxItem::Data(10)));
    }

    #[test]
    fn test_high_water_mark_signal() {
        let mut outbox = Outbox::new(1, 2);
        outbox.add(0, 'a');
        assert!(!outbox.has_reached_limit(0));
        outbox.add(0, 'b');
        assert!(outbox.has_reached_limit(0));
        assert_eq!(outbox.remaining_capacity(0), 0);

        // Never refuses past the mark.
        outbox.add(0, 'c');
        assert_eq!(outbox.pending(0), 3);
        assert_eq!(outbox.remaining_capacity(0), 0);
    }

    #[test]
    fn test_done_after_data() {
        let mut outbox = Outbox::new(1, 4);
        outbox.add(0, "x");
        outbox.add_done(0);
        assert_eq!(outbox.pop_front(0), Some(OutboxItem::Data("x")));
        assert_eq!(outbox.pop_front(0), Some(OutboxItem::Done));
    }

    #[test]
    fn test_add_to_all() {
        let mut outbox = Outbox::new(3, 4);
        outbox.add_to_all(&"w".to_string());
        for ordinal in 0..3 {
            assert_eq!(
                outbox.front(ordinal),
                Some(&OutboxItem::Data("w".to_string()))
            );
        }
    }

    #[test]
    #[should_panic(expected = "outbox ordinal 2 >= queue count 2")]
    fn test_add_out_of_range_panics() {
        let mut outbox = Outbox::new(2, 4);
        outbox.add(2, 0u8);
    }

    #[test]
    #[should_panic(expected = "high_water_mark must be > 0")]
    fn test_zero_mark_panics() {
        let _: Outbox<u8> = Outbox::new(1, 0);
    }
}
