//! Lifecycle states of a slice set.

use std::fmt;

/// Where a slice set is in its per-turn `update -> compute_statistics` cycle.
///
/// ```text
/// Uninitialized --update--> Partitioned --compute_statistics--> StatisticsComputed
///                               ^                                      |
///                               +---------------update-----------------+
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliceState {
    /// No update has completed yet.
    Uninitialized,
    /// Boundaries and counts are current; moments are not.
    Partitioned,
    /// Boundaries, counts, and moments all reflect the latest update.
    StatisticsComputed,
}

impl fmt::Display for SliceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Partitioned => write!(f, "partitioned"),
            Self::StatisticsComputed => write!(f, "statistics computed"),
        }
    }
}
