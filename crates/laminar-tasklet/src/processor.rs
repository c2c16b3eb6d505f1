//! The user-supplied processing stage driven by a tasklet.

use crate::context::ProcessorContext;
use crate::error::Result;
use crate::inbox::Inbox;
use crate::outbox::Outbox;

/// Processing logic of one dataflow vertex instance.
///
/// The tasklet owns both buffers and lends them to the processor for the
/// duration of each call. A processor must not block; when an outbox queue
/// reaches its high-water mark it should return early and let the tasklet
/// flush. Any item left in the inbox is handed back on the next call.
pub trait Processor<T>: Send {
    /// One-time initialization, called before the first invocation.
    ///
    /// Items added to `outbox` here are flushed by the first invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the processor cannot start.
    fn init(&mut self, _context: &ProcessorContext, _outbox: &mut Outbox<T>) -> Result<()> {
        Ok(())
    }

    /// Consumes any number of items from `inbox`, all of which came from
    /// the input with the given ordinal.
    ///
    /// # Errors
    ///
    /// Returns an error if processing failed. The tasklet stops for good.
    fn process(
        &mut self,
        ordinal: usize,
        inbox: &mut Inbox<T>,
        outbox: &mut Outbox<T>,
    ) -> Result<()>;

    /// Called after the input with the given ordinal is exhausted.
    ///
    /// Returns `true` once that input's tear-down is finished; `false`
    /// makes the tasklet call again on the next invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if completion failed.
    fn complete_edge(&mut self, _ordinal: usize, _outbox: &mut Outbox<T>) -> Result<bool> {
        Ok(true)
    }

    /// Called after every input is exhausted and acknowledged.
    ///
    /// Returns `true` once the processor is finished; `false` makes the
    /// tasklet call again on the next invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if completion failed.
    fn complete(&mut self, _outbox: &mut Outbox<T>) -> Result<bool> {
        Ok(true)
    }

    /// Whether invocations may block on external I/O.
    ///
    /// Advisory only: the scheduler uses it to place the tasklet on a
    /// dedicated thread.
    fn is_blocking(&self) -> bool {
        false
    }
}
