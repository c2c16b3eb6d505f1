//! Circular cursor over a shrinking group of items.
//!
//! Used to rotate through the inbound edges of one priority group so that
//! no edge is starved: every edge gets a turn before any edge is revisited.

/// Cyclic cursor over a `Vec` that supports in-place removal.
///
/// The cursor starts at the first element. [`advance`](Self::advance) wraps
/// around at the end. [`remove_current`](Self::remove_current) removes the
/// element under the cursor and steps the cursor back by one slot, so the
/// next `advance` lands on the element that followed the removed one.
#[derive(Debug)]
pub struct CircularCursor<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> CircularCursor<T> {
    /// Creates a cursor positioned at the first element of `items`.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }

    /// Returns the element under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the group is empty.
    #[must_use]
    pub fn current(&self) -> &T {
        assert!(!self.items.is_empty(), "current() on empty cursor");
        &self.items[self.index]
    }

    /// Returns the element under the cursor mutably.
    ///
    /// # Panics
    ///
    /// Panics if the group is empty.
    pub fn current_mut(&mut self) -> &mut T {
        assert!(!self.items.is_empty(), "current_mut() on empty cursor");
        &mut self.items[self.index]
    }

    /// Moves to the next element, wrapping around at the end.
    ///
    /// Returns `false` if the group is empty, in which case the caller
    /// should discard the cursor.
    pub fn advance(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.index = (self.index + 1) % self.items.len();
        true
    }

    /// Removes and returns the element under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the group is empty.
    pub fn remove_current(&mut self) -> T {
        assert!(!self.items.is_empty(), "remove_current() on empty cursor");
        let removed = self.items.remove(self.index);
        let len = self.items.len();
        // Step back so that advance() yields the follower of the removed item.
        self.index = if len == 0 {
            0
        } else {
            (self.index + len - 1) % len
        };
        removed
    }

    /// Number of elements still in rotation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether every element has been removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the elements still in rotation, in group order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}
