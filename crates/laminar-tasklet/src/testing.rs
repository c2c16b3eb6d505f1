//! Scripted edges and processors for exercising tasklets in tests.
//!
//! Each mock exposes a shared record (`Arc<parking_lot::Mutex<_>>`) so a
//! test can keep observing it after the mock has been boxed and moved into
//! a tasklet.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::context::ProcessorContext;
use crate::edge::{InboundEdge, OutboundEdge};
use crate::error::Result;
use crate::inbox::Inbox;
use crate::outbox::Outbox;
use crate::processor::Processor;
use crate::progress::ProgressState;
use crate::tasklet::Tasklet;

/// Invokes `tasklet` until it reports done or `max_invocations` is reached.
///
/// Returns every state observed, in order.
///
/// # Errors
///
/// Propagates the first invocation error.
pub fn drive<K: Tasklet + ?Sized>(
    tasklet: &mut K,
    max_invocations: usize,
) -> Result<Vec<ProgressState>> {
    let mut states = Vec::new();
    for _ in 0..max_invocations {
        let state = tasklet.invoke()?;
        states.push(state);
        if state.is_done() {
            break;
        }
    }
    Ok(states)
}

/// Shared log of inbound ordinals in the order they were drained.
pub type DrainLog = Arc<Mutex<Vec<usize>>>;

/// Inbound edge replaying a fixed script of batches.
///
/// Each drain delivers the next batch (an empty batch means "nothing
/// available right now"). The edge reports exhaustion together with the
/// drain that hands over its last item; an edge scripted with no batches
/// reports exhaustion on the first drain without progress.
#[derive(Debug)]
pub struct ScriptedInbound<T> {
    ordinal: usize,
    priority: i32,
    batches: VecDeque<Vec<T>>,
    pending: VecDeque<T>,
    stalled: bool,
    exhausted: bool,
    drain_log: Option<DrainLog>,
}

impl<T> ScriptedInbound<T> {
    /// Creates an edge that delivers `batches` and then is exhausted.
    #[must_use]
    pub fn new(ordinal: usize, priority: i32, batches: Vec<Vec<T>>) -> Self {
        Self {
            ordinal,
            priority,
            batches: batches.into(),
            pending: VecDeque::new(),
            stalled: false,
            exhausted: false,
            drain_log: None,
        }
    }

    /// Creates an edge that never delivers and never finishes.
    #[must_use]
    pub fn stalled(ordinal: usize, priority: i32) -> Self {
        Self {
            stalled: true,
            ..Self::new(ordinal, priority, Vec::new())
        }
    }

    /// Appends this edge's ordinal to `log` on every drain.
    #[must_use]
    pub fn with_drain_log(mut self, log: DrainLog) -> Self {
        self.drain_log = Some(log);
        self
    }
}

impl<T: Send> InboundEdge<T> for ScriptedInbound<T> {
    fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn drain_into(&mut self, inbox: &mut Inbox<T>) -> Result<ProgressState> {
        if let Some(log) = &self.drain_log {
            log.lock().push(self.ordinal);
        }
        if self.stalled {
            return Ok(ProgressState::NoProgress);
        }
        if self.exhausted {
            return Ok(ProgressState::WasAlreadyDone);
        }
        if self.pending.is_empty() {
            if let Some(batch) = self.batches.pop_front() {
                self.pending.extend(batch);
            }
        }
        let moved = inbox.fill_from(&mut self.pending);
        self.exhausted = self.batches.is_empty() && self.pending.is_empty();
        Ok(ProgressState::from_flags(moved > 0, self.exhausted))
    }
}

/// Something an outbound edge accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent<T> {
    /// An accepted item.
    Item(T),
    /// A completed close.
    Close,
}

/// Everything a [`RecordingOutbound`] saw.
#[derive(Debug)]
pub struct OutboundRecord<T> {
    /// Accepted items and closes, in order.
    pub events: Vec<OutboundEvent<T>>,
    /// Every `offer` call, accepted or not.
    pub offer_attempts: usize,
    /// Every `close` call, completed or not.
    pub close_attempts: usize,
}

impl<T> Default for OutboundRecord<T> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            offer_attempts: 0,
            close_attempts: 0,
        }
    }
}

/// Outbound edge recording what it accepts, with scripted refusals.
#[derive(Debug)]
pub struct RecordingOutbound<T> {
    ordinal: usize,
    record: Arc<Mutex<OutboundRecord<T>>>,
    refuse_offers: usize,
    refuse_closes: usize,
    always_refuse: bool,
}

impl<T> RecordingOutbound<T> {
    /// Creates an edge that accepts everything.
    #[must_use]
    pub fn new(ordinal: usize) -> Self {
        Self {
            ordinal,
            record: Arc::new(Mutex::new(OutboundRecord::default())),
            refuse_offers: 0,
            refuse_closes: 0,
            always_refuse: false,
        }
    }

    /// Refuses the next `n` offers before accepting.
    #[must_use]
    pub fn refusing_offers(mut self, n: usize) -> Self {
        self.refuse_offers = n;
        self
    }

    /// Leaves the next `n` closes incomplete before completing.
    #[must_use]
    pub fn refusing_closes(mut self, n: usize) -> Self {
        self.refuse_closes = n;
        self
    }

    /// Refuses every offer.
    #[must_use]
    pub fn always_refusing(mut self) -> Self {
        self.always_refuse = true;
        self
    }

    /// Shared handle to what this edge saw.
    #[must_use]
    pub fn record(&self) -> Arc<Mutex<OutboundRecord<T>>> {
        Arc::clone(&self.record)
    }
}

impl<T: Clone + Send> OutboundEdge<T> for RecordingOutbound<T> {
    fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn offer(&mut self, item: &T) -> Result<ProgressState> {
        let mut record = self.record.lock();
        record.offer_attempts += 1;
        if self.always_refuse {
            return Ok(ProgressState::NoProgress);
        }
        if self.refuse_offers > 0 {
            self.refuse_offers -= 1;
            return Ok(ProgressState::NoProgress);
        }
        record.events.push(OutboundEvent::Item(item.clone()));
        Ok(ProgressState::Done)
    }

    fn close(&mut self) -> Result<ProgressState> {
        let mut record = self.record.lock();
        record.close_attempts += 1;
        if self.refuse_closes > 0 {
            self.refuse_closes -= 1;
            return Ok(ProgressState::NoProgress);
        }
        record.events.push(OutboundEvent::Close);
        Ok(ProgressState::Done)
    }
}

/// Everything a [`PassThroughProcessor`] was asked to do.
#[derive(Debug)]
pub struct ProcessorRecord<T> {
    /// `(input ordinal, item)` in processing order.
    pub processed: Vec<(usize, T)>,
    /// Inputs whose completion was acknowledged, in order.
    pub edges_completed: Vec<usize>,
    /// Every `complete_edge` call.
    pub complete_edge_calls: usize,
    /// Every `complete` call.
    pub complete_calls: usize,
    /// Every `init` call.
    pub init_calls: usize,
    /// Name of the installed context seen during each `process` call.
    pub contexts_seen: Vec<Option<String>>,
}

impl<T> Default for ProcessorRecord<T> {
    fn default() -> Self {
        Self {
            processed: Vec::new(),
            edges_completed: Vec::new(),
            complete_edge_calls: 0,
            complete_calls: 0,
            init_calls: 0,
            contexts_seen: Vec::new(),
        }
    }
}

/// Processor copying every input item to every output.
///
/// Stops emitting as soon as any outbox queue reaches its high-water mark.
#[derive(Debug)]
pub struct PassThroughProcessor<T> {
    record: Arc<Mutex<ProcessorRecord<T>>>,
    completion_delay: usize,
    edge_completion_delay: usize,
    edge_refusals: HashMap<usize, usize>,
    blocking: bool,
}

impl<T> Default for PassThroughProcessor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PassThroughProcessor<T> {
    /// Creates a processor that completes immediately.
    #[must_use]
    pub fn new() -> Self {
        Self {
            record: Arc::new(Mutex::new(ProcessorRecord::default())),
            completion_delay: 0,
            edge_completion_delay: 0,
            edge_refusals: HashMap::new(),
            blocking: false,
        }
    }

    /// `complete` returns false `n` times before returning true.
    #[must_use]
    pub fn with_completion_delay(mut self, n: usize) -> Self {
        self.completion_delay = n;
        self
    }

    /// `complete_edge` returns false `n` times per input before returning true.
    #[must_use]
    pub fn with_edge_completion_delay(mut self, n: usize) -> Self {
        self.edge_completion_delay = n;
        self
    }

    /// Sets the advisory blocking flag.
    #[must_use]
    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    /// Shared handle to what this processor did.
    #[must_use]
    pub fn record(&self) -> Arc<Mutex<ProcessorRecord<T>>> {
        Arc::clone(&self.record)
    }
}

impl<T: Clone + Send> Processor<T> for PassThroughProcessor<T> {
    fn init(&mut self, _context: &ProcessorContext, _outbox: &mut Outbox<T>) -> Result<()> {
        self.record.lock().init_calls += 1;
        Ok(())
    }

    fn process(
        &mut self,
        ordinal: usize,
        inbox: &mut Inbox<T>,
        outbox: &mut Outbox<T>,
    ) -> Result<()> {
        let mut record = self.record.lock();
        record
            .contexts_seen
            .push(ProcessorContext::current().map(|ctx| ctx.name().to_string()));
        loop {
            if (0..outbox.queue_count()).any(|o| outbox.has_reached_limit(o)) {
                break;
            }
            let Some(item) = inbox.poll() else {
                break;
            };
            outbox.add_to_all(&item);
            record.processed.push((ordinal, item));
        }
        Ok(())
    }

    fn complete_edge(&mut self, ordinal: usize, _outbox: &mut Outbox<T>) -> Result<bool> {
        let mut record = self.record.lock();
        record.complete_edge_calls += 1;
        let refusals = self.edge_refusals.entry(ordinal).or_insert(0);
        if *refusals < self.edge_completion_delay {
            *refusals += 1;
            return Ok(false);
        }
        record.edges_completed.push(ordinal);
        Ok(true)
    }

    fn complete(&mut self, _outbox: &mut Outbox<T>) -> Result<bool> {
        self.record.lock().complete_calls += 1;
        if self.completion_delay > 0 {
            self.completion_delay -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn is_blocking(&self) -> bool {
        self.blocking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_inbound_batches() {
        let mut edge = ScriptedInbound::new(0, 0, vec![vec![1, 2], vec![], vec![3]]);
        let mut inbox = Inbox::with_capacity(8);

        assert_eq!(edge.drain_into(&mut inbox).unwrap(), ProgressState::MadeProgress);
        assert_eq!(inbox.len(), 2);
        assert_eq!(edge.drain_into(&mut inbox).unwrap(), ProgressState::NoProgress);
        assert_eq!(edge.drain_into(&mut inbox).unwrap(), ProgressState::Done);
        assert_eq!(inbox.drain().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_scripted_inbound_respects_inbox_capacity() {
        let mut edge = ScriptedInbound::new(0, 0, vec![vec![1, 2, 3]]);
        let mut inbox = Inbox::with_capacity(2);

        assert_eq!(edge.drain_into(&mut inbox).unwrap(), ProgressState::MadeProgress);
        inbox.clear();
        assert_eq!(edge.drain_into(&mut inbox).unwrap(), ProgressState::Done);
        assert_eq!(inbox.poll(), Some(3));
    }

    #[test]
    fn test_empty_script_is_exhausted() {
        let mut edge: ScriptedInbound<u8> = ScriptedInbound::new(0, 0, vec![]);
        let mut inbox = Inbox::with_capacity(2);
        assert_eq!(
            edge.drain_into(&mut inbox).unwrap(),
            ProgressState::WasAlreadyDone
        );
    }

    #[test]
    fn test_recording_outbound_refusals() {
        let mut edge = RecordingOutbound::new(0).refusing_offers(1).refusing_closes(1);
        let record = edge.record();

        assert_eq!(edge.offer(&5).unwrap(), ProgressState::NoProgress);
        assert_eq!(edge.offer(&5).unwrap(), ProgressState::Done);
        assert_eq!(edge.close().unwrap(), ProgressState::NoProgress);
        assert_eq!(edge.close().unwrap(), ProgressState::Done);

        let record = record.lock();
        assert_eq!(record.events, vec![OutboundEvent::Item(5), OutboundEvent::Close]);
        assert_eq!(record.offer_attempts, 2);
        assert_eq!(record.close_attempts, 2);
    }

    #[test]
    fn test_pass_through_stops_at_high_water_mark() {
        let mut processor = PassThroughProcessor::new();
        let mut inbox = Inbox::with_capacity(8);
        for i in 0..5 {
            inbox.push(i).unwrap();
        }
        let mut outbox = Outbox::new(1, 2);

        processor.process(0, &mut inbox, &mut outbox).unwrap();
        assert_eq!(outbox.pending(0), 2);
        assert_eq!(inbox.len(), 3);
    }
}
