//! Error types for the slicing engine.
//!
//! Three classes of failure, mirroring how a simulation driver reacts:
//! configuration errors are fatal at construction, state errors are
//! caller bugs (results read out of order), and degenerate-input errors
//! are per-turn conditions the driver may skip or halt on.

use std::error::Error;
use std::fmt;

use crate::state::SliceState;

/// Errors from slice-set construction, updates, and result access.
#[derive(Clone, Debug, PartialEq)]
pub enum SliceError {
    /// Invalid construction-time configuration (slice count, window,
    /// beam constants, or mismatched coordinate arrays).
    Configuration {
        /// Human-readable description of the invalid setting.
        reason: String,
    },
    /// An operation was attempted in a lifecycle state that does not
    /// support it, e.g. reading moments before `compute_statistics`.
    State {
        /// The operation that was refused.
        operation: &'static str,
        /// The state the slice set was in.
        actual: SliceState,
    },
    /// The statistics pass was handed a population whose alive count
    /// differs from the one that was partitioned.
    LedgerMismatch {
        /// Alive count recorded by the last update.
        expected: usize,
        /// Alive count of the ledger passed in.
        actual: usize,
    },
    /// The population cannot be sliced this turn (no alive particles
    /// under a dynamic window, or non-finite coordinates).
    DegenerateInput {
        /// Description of the degenerate condition.
        reason: String,
    },
}

impl SliceError {
    /// Shorthand for a [`SliceError::Configuration`] with the given reason.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`SliceError::DegenerateInput`] with the given reason.
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by reading or advancing the slice
    /// set out of order (including a stale partition).
    pub fn is_state_error(&self) -> bool {
        matches!(self, Self::State { .. } | Self::LedgerMismatch { .. })
    }
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => write!(f, "invalid configuration: {reason}"),
            Self::State { operation, actual } => {
                write!(f, "cannot {operation} while slice set is {actual}")
            }
            Self::LedgerMismatch { expected, actual } => write!(
                f,
                "ledger has {actual} alive particles but the partition was built for {expected}"
            ),
            Self::DegenerateInput { reason } => write!(f, "degenerate input: {reason}"),
        }
    }
}

impl Error for SliceError {}
