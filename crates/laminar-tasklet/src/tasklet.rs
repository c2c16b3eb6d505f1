//! Cooperative execution unit driving one processor.
//!
//! A [`ProcessorTasklet`] is invoked repeatedly by an outer scheduler. Each
//! invocation does a bounded amount of non-blocking work:
//!
//! ```text
//! inbound edges ──► Inbox ──► Processor ──► Outbox ──► outbound edges
//!   (fill)                    (process /               (flush)
//!                              complete)
//! ```
//!
//! and reports a [`ProgressState`] telling the scheduler whether to call
//! again soon (`MadeProgress`), back off (`NoProgress`) or retire the
//! tasklet (`Done`).
//!
//! ## Input precedence
//!
//! Inbound edges are grouped by priority. All edges of a lower priority are
//! exhausted, and each exhaustion acknowledged by the processor, before any
//! edge of a higher priority is drained. Inside a group, edges are drained
//! round-robin; one fill visits each edge of the group at most once.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::TaskletConfig;
use crate::context::ProcessorContext;
use crate::cursor::CircularCursor;
use crate::edge::{InboundEdge, OutboundEdge};
use crate::error::{Result, TaskletError};
use crate::group::PriorityGroupQueue;
use crate::inbox::Inbox;
use crate::metrics::TaskletMetrics;
use crate::outbox::{Outbox, OutboxItem};
use crate::processor::Processor;
use crate::progress::{ProgressState, ProgressTracker};

/// Scheduler-facing interface of a cooperative execution unit.
///
/// The scheduler guarantees that calls on one tasklet never overlap;
/// `&mut self` makes that explicit. Once `invoke` returns
/// [`ProgressState::Done`] the tasklet has no further obligations.
pub trait Tasklet: Send {
    /// One-time initialization before the first invocation.
    ///
    /// # Errors
    ///
    /// Propagates processor initialization failures.
    fn init(&mut self) -> Result<()>;

    /// Whether invocations may block; advisory for thread placement.
    fn is_blocking(&self) -> bool;

    /// Performs one bounded unit of work.
    ///
    /// Returns `NoProgress`, `MadeProgress` or `Done`.
    ///
    /// # Errors
    ///
    /// Propagates processor and edge failures. After an error the tasklet
    /// must not be invoked again.
    fn invoke(&mut self) -> Result<ProgressState>;
}

type InboundBox<T> = Box<dyn InboundEdge<T>>;

/// Tasklet driving a [`Processor`] between its inbound and outbound edges.
pub struct ProcessorTasklet<T> {
    context: Arc<ProcessorContext>,
    processor: Box<dyn Processor<T>>,
    instream_groups: PriorityGroupQueue<InboundBox<T>>,
    /// Active priority group and its priority.
    instream_cursor: Option<(i32, CircularCursor<InboundBox<T>>)>,
    inbox: Inbox<T>,
    outbox: Outbox<T>,
    /// Sorted so that position equals ordinal.
    outstreams: Vec<Box<dyn OutboundEdge<T>>>,
    tracker: ProgressTracker,
    metrics: Arc<TaskletMetrics>,
    /// Ordinal of the inbound edge the inbox was last filled from.
    curr_instream: Option<usize>,
    curr_instream_exhausted: bool,
    processor_completed: bool,
    poisoned: bool,
}

impl<T> ProcessorTasklet<T> {
    /// Creates a tasklet for `processor` reading `instreams` and writing
    /// `outstreams`.
    ///
    /// # Errors
    ///
    /// - [`TaskletError::InvalidConfig`] if `config` fails validation
    /// - [`TaskletError::DuplicateInboundOrdinal`] if two inbound edges
    ///   share an ordinal
    /// - [`TaskletError::OutboundOrdinalGap`] if the outbound ordinals are
    ///   not exactly `0..outstreams.len()`
    pub fn new(
        context: ProcessorContext,
        processor: Box<dyn Processor<T>>,
        instreams: Vec<InboundBox<T>>,
        mut outstreams: Vec<Box<dyn OutboundEdge<T>>>,
        config: &TaskletConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::with_capacity(instreams.len());
        for edge in &instreams {
            if !seen.insert(edge.ordinal()) {
                return Err(TaskletError::DuplicateInboundOrdinal(edge.ordinal()));
            }
        }

        outstreams.sort_by_key(|edge| edge.ordinal());
        for (position, edge) in outstreams.iter().enumerate() {
            if edge.ordinal() != position {
                return Err(TaskletError::OutboundOrdinalGap {
                    position,
                    ordinal: edge.ordinal(),
                });
            }
        }

        let mut instream_groups =
            PriorityGroupQueue::new(instreams, |edge: &InboundBox<T>| edge.priority());
        let instream_cursor = instream_groups.pop_next();
        let outbox = Outbox::new(outstreams.len(), config.high_water_mark);

        Ok(Self {
            context: Arc::new(context),
            processor,
            instream_groups,
            instream_cursor,
            inbox: Inbox::with_capacity(config.inbox_capacity),
            outbox,
            outstreams,
            tracker: ProgressTracker::new(),
            metrics: Arc::new(TaskletMetrics::default()),
            curr_instream: None,
            curr_instream_exhausted: false,
            processor_completed: false,
            poisoned: false,
        })
    }

    /// Identity of the processor instance.
    #[must_use]
    pub fn context(&self) -> &Arc<ProcessorContext> {
        &self.context
    }

    /// Shared handle to this tasklet's counters.
    #[must_use]
    pub fn metrics(&self) -> Arc<TaskletMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Staged items not yet accepted downstream.
    #[must_use]
    pub fn outbox(&self) -> &Outbox<T> {
        &self.outbox
    }

    /// Whether the processor's final completion has succeeded.
    #[must_use]
    pub fn is_processor_completed(&self) -> bool {
        self.processor_completed
    }

    /// Whether an earlier call failed.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    fn run_once(&mut self) -> Result<ProgressState> {
        self.tracker.reset();
        self.try_fill_inbox()?;
        if self.tracker.is_done() {
            self.complete_if_needed()?;
        } else if let Some(ordinal) = self.curr_instream {
            if !self.inbox.is_empty() {
                self.tracker.made_progress(true);
                self.try_process_inbox(ordinal)?;
            } else if self.curr_instream_exhausted {
                self.tracker.made_progress(true);
                self.try_complete_edge(ordinal)?;
            }
        }
        self.try_flush_outbox()?;
        Ok(self.tracker.to_progress_state())
    }

    fn try_fill_inbox(&mut self) -> Result<()> {
        // Items still waiting, or an exhausted edge not yet acknowledged.
        if !self.inbox.is_empty() || (self.curr_instream.is_some() && self.curr_instream_exhausted)
        {
            self.tracker.not_done();
            return Ok(());
        }
        let Some((priority, cursor)) = self.instream_cursor.as_mut() else {
            return Ok(());
        };
        let priority = *priority;
        self.tracker.not_done();

        let first = cursor.current().ordinal();
        loop {
            let edge = cursor.current_mut();
            let ordinal = edge.ordinal();
            self.curr_instream = Some(ordinal);

            let before = self.inbox.len();
            let state = edge.drain_into(&mut self.inbox)?;
            self.metrics
                .record_received((self.inbox.len().saturating_sub(before)) as u64);
            self.tracker.made_progress(state.is_made_progress());
            self.curr_instream_exhausted = state.is_done();

            if self.curr_instream_exhausted {
                debug!(ordinal, priority, "inbound edge exhausted");
                cursor.remove_current();
            }
            if !cursor.advance() {
                debug!(priority, "inbound priority group exhausted");
                self.instream_cursor = self.instream_groups.pop_next();
                return Ok(());
            }
            // An exhausted edge must be acknowledged before the next one
            // becomes current.
            if state.is_made_progress()
                || self.curr_instream_exhausted
                || cursor.current().ordinal() == first
            {
                return Ok(());
            }
        }
    }

    fn try_process_inbox(&mut self, ordinal: usize) -> Result<()> {
        self.inbox.reset_observer();
        self.processor
            .process(ordinal, &mut self.inbox, &mut self.outbox)?;
        if !self.inbox.is_empty() {
            trace!(
                ordinal,
                remaining = self.inbox.len(),
                observed_empty = self.inbox.observed_empty(),
                "processor yielded before draining inbox"
            );
            self.tracker.not_done();
        }
        Ok(())
    }

    fn try_complete_edge(&mut self, ordinal: usize) -> Result<()> {
        if self.processor.complete_edge(ordinal, &mut self.outbox)? {
            debug!(ordinal, "inbound edge completed");
            self.curr_instream = None;
            self.curr_instream_exhausted = false;
        }
        Ok(())
    }

    fn complete_if_needed(&mut self) -> Result<()> {
        if self.processor_completed {
            return Ok(());
        }
        self.tracker.made_progress(true);
        if !self.processor.complete(&mut self.outbox)? {
            self.tracker.not_done();
            return Ok(());
        }
        self.processor_completed = true;
        debug!(outbound = self.outstreams.len(), "processor completed");
        for ordinal in 0..self.outstreams.len() {
            self.outbox.add_done(ordinal);
        }
        Ok(())
    }

    fn try_flush_outbox(&mut self) -> Result<()> {
        for (ordinal, outstream) in self.outstreams.iter_mut().enumerate() {
            while let Some(item) = self.outbox.front(ordinal) {
                let state = match item {
                    OutboxItem::Data(data) => outstream.offer(data)?,
                    OutboxItem::Done => outstream.close()?,
                };
                self.tracker.merge(state);
                if !state.is_done() {
                    break;
                }
                match self.outbox.pop_front(ordinal) {
                    Some(OutboxItem::Done) => {
                        debug!(ordinal, "outbound edge closed");
                        self.metrics.record_closed();
                    }
                    Some(OutboxItem::Data(_)) => self.metrics.record_emitted(),
                    None => {}
                }
            }
        }
        Ok(())
    }
}

impl<T: Send> Tasklet for ProcessorTasklet<T> {
    fn init(&mut self) -> Result<()> {
        let context = Arc::clone(&self.context);
        let _guard = ProcessorContext::install(&context);
        if let Err(e) = self.processor.init(&context, &mut self.outbox) {
            warn!(error = %e, "processor init failed");
            self.poisoned = true;
            return Err(e);
        }
        debug!(
            outbound = self.outstreams.len(),
            blocking = self.processor.is_blocking(),
            "tasklet initialized"
        );
        Ok(())
    }

    fn is_blocking(&self) -> bool {
        self.processor.is_blocking()
    }

    fn invoke(&mut self) -> Result<ProgressState> {
        if self.poisoned {
            return Err(TaskletError::Poisoned(self.context.name().to_string()));
        }
        let context = Arc::clone(&self.context);
        let _guard = ProcessorContext::install(&context);
        match self.run_once() {
            Ok(state) => {
                self.metrics
                    .record_invocation(self.tracker.is_made_progress());
                trace!(?state, "tasklet invoked");
                Ok(state)
            }
            Err(e) => {
                warn!(error = %e, "tasklet invocation failed");
                self.poisoned = true;
                Err(e)
            }
        }
    }
}

impl<T> fmt::Debug for ProcessorTasklet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorTasklet")
            .field("vertex", &self.context.name())
            .field("index", &self.context.index())
            .field("pending_groups", &self.instream_groups.len())
            .field("curr_instream", &self.curr_instream)
            .field("processor_completed", &self.processor_completed)
            .field("poisoned", &self.poisoned)
            .finish_non_exhaustive()
    }
}
