//! Tasklet configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskletError};

/// Default per-ordinal outbox high-water mark.
pub const DEFAULT_HIGH_WATER_MARK: usize = 2048;

/// Default inbox capacity.
pub const DEFAULT_INBOX_CAPACITY: usize = 1024;

/// Configuration for a [`ProcessorTasklet`](crate::ProcessorTasklet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskletConfig {
    /// Pending items per outbound ordinal at which the processor should
    /// stop emitting to that ordinal.
    pub high_water_mark: usize,

    /// Maximum items drained into the inbox per fill.
    pub inbox_capacity: usize,
}

impl Default for TaskletConfig {
    fn default() -> Self {
        Self {
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
        }
    }
}

impl TaskletConfig {
    /// Creates a builder for custom configuration.
    #[must_use]
    pub fn builder() -> TaskletConfigBuilder {
        TaskletConfigBuilder::default()
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`TaskletError::InvalidConfig`] if a capacity is zero.
    pub fn validate(&self) -> Result<()> {
        if self.high_water_mark == 0 {
            return Err(TaskletError::InvalidConfig(
                "high_water_mark must be > 0".into(),
            ));
        }
        if self.inbox_capacity == 0 {
            return Err(TaskletError::InvalidConfig(
                "inbox_capacity must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`TaskletConfig`].
#[derive(Debug, Default)]
pub struct TaskletConfigBuilder {
    high_water_mark: Option<usize>,
    inbox_capacity: Option<usize>,
}

impl TaskletConfigBuilder {
    /// Sets the outbox high-water mark.
    #[must_use]
    pub fn high_water_mark(mut self, mark: usize) -> Self {
        self.high_water_mark = Some(mark);
        self
    }

    /// Sets the inbox capacity.
    #[must_use]
    pub fn inbox_capacity(mut self, capacity: usize) -> Self {
        self.inbox_capacity = Some(capacity);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> TaskletConfig {
        TaskletConfig {
            high_water_mark: self.high_water_mark.unwrap_or(DEFAULT_HIGH_WATER_MARK),
            inbox_capacity: self.inbox_capacity.unwrap_or(DEFAULT_INBOX_CAPACITY),
        }
    }
}
