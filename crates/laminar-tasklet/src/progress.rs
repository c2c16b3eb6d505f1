//! Progress reporting between edges, the tasklet and its scheduler.
//!
//! Every drain, offer, close and completion step reports a
//! [`ProgressState`]: whether it moved anything forward, and whether the
//! underlying work is finished. A [`ProgressTracker`] folds the states of one
//! invocation into the single result handed back to the scheduler.

/// Outcome of one edge operation or of a whole tasklet invocation.
///
/// Equivalent to the pair `(made_progress, is_done)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    /// Nothing moved forward and there is more work to do.
    NoProgress,
    /// Something moved forward and there is more work to do.
    MadeProgress,
    /// Something moved forward and the work is now finished.
    Done,
    /// Nothing moved forward because the work was already finished.
    WasAlreadyDone,
}

impl ProgressState {
    /// Builds the state for the given `(made_progress, is_done)` pair.
    #[must_use]
    pub const fn from_flags(made_progress: bool, is_done: bool) -> Self {
        match (made_progress, is_done) {
            (false, false) => Self::NoProgress,
            (true, false) => Self::MadeProgress,
            (true, true) => Self::Done,
            (false, true) => Self::WasAlreadyDone,
        }
    }

    /// Whether the operation moved anything forward.
    #[inline]
    #[must_use]
    pub const fn is_made_progress(self) -> bool {
        matches!(self, Self::MadeProgress | Self::Done)
    }

    /// Whether the operation's work is finished.
    #[inline]
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done | Self::WasAlreadyDone)
    }
}

/// Per-invocation accumulator of progress.
///
/// Starts out "done, no progress". Any step with pending work calls
/// [`not_done`](Self::not_done); any step that moved something calls
/// [`made_progress`](Self::made_progress).
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    done: bool,
    made_progress: bool,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    /// Creates a tracker in the reset state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            done: true,
            made_progress: false,
        }
    }

    /// Resets to "done, no progress" at the start of an invocation.
    pub fn reset(&mut self) {
        self.done = true;
        self.made_progress = false;
    }

    /// Records that work remains.
    pub fn not_done(&mut self) {
        self.done = false;
    }

    /// Records progress if `progress` is true. A false argument never
    /// clears progress recorded earlier in the same invocation.
    pub fn made_progress(&mut self, progress: bool) {
        self.made_progress |= progress;
    }

    /// Folds an edge operation's state into the tracker.
    pub fn merge(&mut self, state: ProgressState) {
        self.made_progress(state.is_made_progress());
        if !state.is_done() {
            self.not_done();
        }
    }

    /// Whether no step has reported pending work so far.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Whether any step has reported progress so far.
    #[must_use]
    pub const fn is_made_progress(&self) -> bool {
        self.made_progress
    }

    /// Collapses the tracker into the scheduler-facing tri-state.
    #[must_use]
    pub const fn to_progress_state(&self) -> ProgressState {
        if self.done {
            ProgressState::Done
        } else if self.made_progress {
            ProgressState::MadeProgress
        } else {
            ProgressState::NoProgress
        }
    }
}
