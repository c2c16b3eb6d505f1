//! Bounded working buffer between an inbound edge and the processor.

use std::collections::VecDeque;

/// Items drained from the active inbound edge, awaiting the processor.
///
/// The inbox is reused across invocations. Inbound edges fill it through
/// [`push`](Self::push), which refuses items once the capacity is reached.
/// The processor consumes items through [`poll`](Self::poll) or
/// [`drain`](Self::drain) and may stop early, leaving the rest for the next
/// invocation.
///
/// An observer flag records whether the processor looked into the inbox and
/// found it empty during the current processor call.
#[derive(Debug)]
pub struct Inbox<T> {
    items: VecDeque<T>,
    capacity: usize,
    observed_empty: bool,
}

impl<T> Inbox<T> {
    /// Creates an empty inbox holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Inbox capacity must be > 0");
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            observed_empty: false,
        }
    }

    /// Appends an item.
    ///
    /// # Errors
    ///
    /// Returns `Err(item)` if the inbox is full, giving back ownership of the
    /// item that couldn't be inserted.
    #[inline]
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.items.len() >= self.capacity {
            return Err(item);
        }
        self.items.push_back(item);
        Ok(())
    }

    /// Moves items from `source` until the inbox is full or `source` is empty.
    ///
    /// Returns the number of items moved.
    pub fn fill_from(&mut self, source: &mut VecDeque<T>) -> usize {
        let n = self.remaining_capacity().min(source.len());
        self.items.extend(source.drain(..n));
        n
    }

    /// Removes and returns the oldest item.
    pub fn poll(&mut self) -> Option<T> {
        let item = self.items.pop_front();
        if item.is_none() {
            self.observed_empty = true;
        }
        item
    }

    /// Returns the oldest item without removing it.
    pub fn peek(&mut self) -> Option<&T> {
        if self.items.is_empty() {
            self.observed_empty = true;
        }
        self.items.front()
    }

    /// Removes and yields every item, oldest first.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, T> {
        self.observed_empty = true;
        self.items.drain(..)
    }

    /// Iterates over the buffered items without consuming them.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of buffered items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are buffered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of buffered items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots left before `push` starts refusing.
    #[inline]
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.items.len()
    }

    /// Whether at least one more item fits.
    #[inline]
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.items.len() < self.capacity
    }

    /// Drops every buffered item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the processor found the inbox empty since the last reset.
    #[must_use]
    pub fn observed_empty(&self) -> bool {
        self.observed_empty
    }

    /// Clears the observer flag before handing the inbox to the processor.
    pub fn reset_observer(&mut self) {
        self.observed_empty = false;
    }
}
