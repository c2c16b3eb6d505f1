//! # LaminarDB Tasklet
//!
//! Cooperative execution unit for dataflow vertices. A tasklet drives one
//! [`Processor`] between its inbound and outbound edges, one bounded,
//! non-blocking step at a time, and tells the scheduler how it went.
//!
//! ## Architecture
//!
//! ```text
//!  ┌────────────────────────────┐
//!  │ PriorityGroupQueue         │  priority 0: [in0, in2]  ◄─ round-robin
//!  │  (CircularCursor per group)│  priority 1: [in1]
//!  └─────────────┬──────────────┘
//!                ▼ drain_into
//!          ┌──────────┐  process   ┌───────────┐  offer / close  ┌──────────┐
//!          │  Inbox   │ ─────────► │  Outbox   │ ──────────────► │ out0..N  │
//!          └──────────┘ Processor  │ (per-ord. │                 └──────────┘
//!                                  │  queues)  │
//!                                  └───────────┘
//! ```
//!
//! Each [`Tasklet::invoke`] returns a [`ProgressState`]:
//!
//! | State | Scheduler action |
//! |-------|------------------|
//! | `MadeProgress` | invoke again soon |
//! | `NoProgress` | back off, inputs or outputs are stalled |
//! | `Done` | retire the tasklet |
//!
//! ## Example
//!
//! ```rust
//! use laminar_tasklet::testing::{
//!     drive, PassThroughProcessor, RecordingOutbound, ScriptedInbound,
//! };
//! use laminar_tasklet::{
//!     ProcessorContext, ProcessorTasklet, ProgressState, Tasklet, TaskletConfig,
//! };
//!
//! let out = RecordingOutbound::new(0);
//! let record = out.record();
//! let mut tasklet = ProcessorTasklet::<u64>::new(
//!     ProcessorContext::new("map", 0),
//!     Box::new(PassThroughProcessor::<u64>::new()),
//!     vec![Box::new(ScriptedInbound::<u64>::new(0, 0, vec![vec![1, 2, 3]]))],
//!     vec![Box::new(out)],
//!     &TaskletConfig::default(),
//! )?;
//! tasklet.init()?;
//!
//! let states = drive(&mut tasklet, 16)?;
//! assert_eq!(states.last(), Some(&ProgressState::Done));
//! assert_eq!(record.lock().events.len(), 4); // three items and the close
//! # Ok::<(), laminar_tasklet::TaskletError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod context;
pub mod cursor;
pub mod edge;
pub mod error;
pub mod group;
pub mod inbox;
pub mod metrics;
pub mod outbox;
pub mod processor;
pub mod progress;
pub mod tasklet;
pub mod testing;

pub use config::{
    TaskletConfig, TaskletConfigBuilder, DEFAULT_HIGH_WATER_MARK, DEFAULT_INBOX_CAPACITY,
};
pub use context::{ContextGuard, ProcessorContext};
pub use cursor::CircularCursor;
pub use edge::{InboundEdge, OutboundEdge};
pub use error::{Result, TaskletError};
pub use group::PriorityGroupQueue;
pub use inbox::Inbox;
pub use metrics::{TaskletMetrics, TaskletMetricsSnapshot};
pub use outbox::{Outbox, OutboxItem};
pub use processor::Processor;
pub use progress::{ProgressState, ProgressTracker};
pub use tasklet::{ProcessorTasklet, Tasklet};
