//! Build configuration.

use crate::error::{KdTreeError, Result};

/// Default leaf size threshold.
pub const DEFAULT_MAX_CHILDREN: usize = 16;

/// Sub-ranges larger than this are built on separate rayon tasks.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Parameters controlling tree construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeConfig {
    /// A node holding fewer entities than this becomes a leaf.
    pub max_children: usize,
    /// Minimum sub-range size worth forking in a parallel build.
    pub parallel_threshold: usize,
}

impl TreeConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the leaf size threshold.
    #[must_use]
    pub fn with_max_children(mut self, max_children: usize) -> Self {
        self.max_children = max_children;
        self
    }

    /// Sets the parallel fork threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KdTreeError::InvalidMaxChildren`] if `max_children` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_children == 0 {
            return Err(KdTreeError::InvalidMaxChildren(self.max_children));
        }
        Ok(())
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_children: DEFAULT_MAX_CHILDREN,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
