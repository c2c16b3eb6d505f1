//! Inbound and outbound edge abstractions.
//!
//! Concrete transports (in-process queues, network channels) live in the
//! engine. The tasklet only depends on these traits. All operations must
//! be non-blocking and report partial progress through [`ProgressState`]
//! instead of waiting.

use crate::error::Result;
use crate::inbox::Inbox;
use crate::progress::ProgressState;

/// A data channel feeding into a processor.
pub trait InboundEdge<T>: Send {
    /// Slot index of this edge among the processor's inputs.
    fn ordinal(&self) -> usize;

    /// Drain precedence; lower values are drained first.
    fn priority(&self) -> i32;

    /// Moves currently available items into `inbox`.
    ///
    /// Must respect [`Inbox::has_capacity`]. The returned state reports
    /// whether any item was moved and whether the edge is exhausted (no
    /// more items will ever arrive). An exhausted edge is never drained
    /// again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskletError::InboundEdge`](crate::TaskletError::InboundEdge)
    /// if the transport failed.
    fn drain_into(&mut self, inbox: &mut Inbox<T>) -> Result<ProgressState>;
}

/// A data channel leaving a processor.
pub trait OutboundEdge<T>: Send {
    /// Position of this edge among the processor's outputs.
    fn ordinal(&self) -> usize;

    /// Offers one item.
    ///
    /// A state that is not done means the item was not accepted; the same
    /// item is offered again on a later invocation. Edges that need
    /// ownership clone the item once they accept it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskletError::OutboundEdge`](crate::TaskletError::OutboundEdge)
    /// if the transport failed.
    fn offer(&mut self, item: &T) -> Result<ProgressState>;

    /// Signals that no more items follow.
    ///
    /// May complete asynchronously; a state that is not done means `close`
    /// is called again on a later invocation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskletError::OutboundEdge`](crate::TaskletError::OutboundEdge)
    /// if the transport failed.
    fn close(&mut self) -> Result<ProgressState>;
}
