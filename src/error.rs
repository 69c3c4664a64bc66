//! Error types for tree construction and queries.

use thiserror::Error;

/// Errors reported for invalid build or query arguments.
///
/// Every variant is a caller error. Nothing is clamped or retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum KdTreeError {
    /// Leaves must be allowed to hold at least one entity.
    #[error("max_children must be at least 1, got {0}")]
    InvalidMaxChildren(usize),

    /// A query asked for zero neighbors.
    #[error("max_count must be at least 1")]
    InvalidMaxCount,

    /// A query radius was NaN or negative.
    #[error("max_distance must be a non-negative number")]
    InvalidMaxDistance,

    /// A query position had a NaN or infinite coordinate.
    #[error("query position must have finite coordinates")]
    NonFiniteQuery,

    /// An entity position had a NaN or infinite coordinate.
    #[error("entity {index} has a non-finite position")]
    NonFinitePosition {
        /// Index of the offending entity in the input.
        index: usize,
    },

    /// Selection rank outside the slice.
    #[error("selection index {kth} out of range for length {len}")]
    SelectIndexOutOfRange {
        /// Requested rank.
        kth: usize,
        /// Slice length.
        len: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = KdTreeError> = std::result::Result<T, E>;
