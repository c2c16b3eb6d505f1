//! Error types for the processor tasklet.
//!
//! Every error carries a stable `LDB-NNNN` code in its message, allocated
//! from the engine-wide registry ranges. Codes are never reused.

/// Stable error codes for tasklet failures.
///
/// | Code | Range | Category |
/// |------|-------|----------|
/// | `LDB-0001`, `LDB-0010`..`LDB-0011` | `LDB-0xxx` | Configuration / topology |
/// | `LDB-5030`..`LDB-5031` | `LDB-5xxx` | Edge I/O |
/// | `LDB-8020`..`LDB-8021` | `LDB-8xxx` | Processor failure, lifecycle misuse |
pub mod codes {
    // ── General / Configuration (LDB-0xxx) ──

    /// Invalid tasklet configuration value. Shared with the engine registry.
    pub const INVALID_CONFIG: &str = "LDB-0001";
    /// Outbound edge ordinals are not exactly `0..n`.
    pub const OUTBOUND_ORDINAL_GAP: &str = "LDB-0010";
    /// Two inbound edges share the same ordinal.
    pub const DUPLICATE_INBOUND_ORDINAL: &str = "LDB-0011";

    // ── Edge I/O (LDB-5xxx) ──

    /// An inbound edge failed while draining.
    pub const INBOUND_EDGE_FAILED: &str = "LDB-5030";
    /// An outbound edge failed during offer or close.
    pub const OUTBOUND_EDGE_FAILED: &str = "LDB-5031";

    // ── Processor / Lifecycle (LDB-8xxx) ──

    /// The processor failed during init, process or completion.
    pub const PROCESSOR_FAILED: &str = "LDB-8020";
    /// The tasklet was invoked after a previous invocation failed.
    pub const POISONED: &str = "LDB-8021";
}

/// Errors raised by a tasklet or by the collaborators it drives.
#[derive(Debug, thiserror::Error)]
pub enum TaskletError {
    /// Configuration failed validation.
    #[error("[LDB-0001] invalid tasklet config: {0}")]
    InvalidConfig(String),

    /// Outbound ordinals must form the contiguous range `0..n`.
    #[error("[LDB-0010] outbound edge at position {position} has ordinal {ordinal}")]
    OutboundOrdinalGap {
        /// Position in the ordinal-sorted outbound list.
        position: usize,
        /// Ordinal reported by the edge at that position.
        ordinal: usize,
    },

    /// Inbound ordinals must be unique.
    #[error("[LDB-0011] duplicate inbound ordinal {0}")]
    DuplicateInboundOrdinal(usize),

    /// The processor reported a failure.
    #[error("[LDB-8020] processor failed: {message}")]
    Processor {
        /// Failure description.
        message: String,
    },

    /// An inbound edge reported a failure.
    #[error("[LDB-5030] inbound edge {ordinal} failed: {message}")]
    InboundEdge {
        /// Ordinal of the failing edge.
        ordinal: usize,
        /// Failure description.
        message: String,
    },

    /// An outbound edge reported a failure.
    #[error("[LDB-5031] outbound edge {ordinal} failed: {message}")]
    OutboundEdge {
        /// Ordinal of the failing edge.
        ordinal: usize,
        /// Failure description.
        message: String,
    },

    /// A previous invocation failed; the tasklet must not be invoked again.
    #[error("[LDB-8021] tasklet '{0}' failed earlier and cannot be invoked")]
    Poisoned(String),
}

impl TaskletError {
    /// Creates a processor failure.
    pub fn processor(message: impl Into<String>) -> Self {
        Self::Processor {
            message: message.into(),
        }
    }

    /// Creates an inbound edge failure.
    pub fn inbound(ordinal: usize, message: impl Into<String>) -> Self {
        Self::InboundEdge {
            ordinal,
            message: message.into(),
        }
    }

    /// Creates an outbound edge failure.
    pub fn outbound(ordinal: usize, message: impl Into<String>) -> Self {
        Self::OutboundEdge {
            ordinal,
            message: message.into(),
        }
    }

    /// Returns the stable `LDB-NNNN` code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => codes::INVALID_CONFIG,
            Self::OutboundOrdinalGap { .. } => codes::OUTBOUND_ORDINAL_GAP,
            Self::DuplicateInboundOrdinal(_) => codes::DUPLICATE_INBOUND_ORDINAL,
            Self::Processor { .. } => codes::PROCESSOR_FAILED,
            Self::InboundEdge { .. } => codes::INBOUND_EDGE_FAILED,
            Self::OutboundEdge { .. } => codes::OUTBOUND_EDGE_FAILED,
            Self::Poisoned(_) => codes::POISONED,
        }
    }
}

/// Result alias for tasklet operations.
pub type Result<T> = std::result::Result<T, TaskletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = TaskletError::outbound(3, "socket reset");
        let msg = err.to_string();
        assert!(msg.starts_with("[LDB-5031]"));
        assert!(msg.contains("outbound edge 3"));
        assert!(msg.contains("socket reset"));
    }

    #[test]
    fn test_codes_are_unique() {
        let all = [
            codes::INVALID_CONFIG,
            codes::OUTBOUND_ORDINAL_GAP,
            codes::DUPLICATE_INBOUND_ORDINAL,
            codes::PROCESSOR_FAILED,
            codes::INBOUND_EDGE_FAILED,
            codes::OUTBOUND_EDGE_FAILED,
            codes::POISONED,
        ];
        let mut sorted = all.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), all.len());
    }

    #[test]
    fn test_code_matches_variant() {
        assert_eq!(TaskletError::processor("x").code(), "LDB-8020");
        assert_eq!(TaskletError::inbound(0, "x").code(), "LDB-5030");
        assert_eq!(
            TaskletError::Poisoned("t".into()).code(),
            codes::POISONED
        );
        assert_eq!(
            TaskletError::DuplicateInboundOrdinal(1).code(),
            codes::DUPLICATE_INBOUND_ORDINAL
        );
    }

    #[test]
    fn test_display_prefix_matches_code_outside_sql_internal_range() {
        let all = [
            TaskletError::InvalidConfig("x".into()),
            TaskletError::OutboundOrdinalGap {
                position: 0,
                ordinal: 1,
            },
            TaskletError::DuplicateInboundOrdinal(0),
            TaskletError::processor("x"),
            TaskletError::inbound(0, "x"),
            TaskletError::outbound(0, "x"),
            TaskletError::Poisoned("t".into()),
        ];
        for err in &all {
            let code = err.code();
            assert!(err.to_string().starts_with(&format!("[{code}]")), "{err}");
            // LDB-9000..LDB-9099 belongs to the SQL layer.
            assert!(!code.starts_with("LDB-90"), "{code}");
        }
        assert_eq!(codes::INVALID_CONFIG, "LDB-0001");
    }
}
