//! Loader configuration.

use serde::{Deserialize, Serialize};

use crate::tag_store::CacheRetention;

/// What to do with rows left over once a single-row destination is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtraRows {
    /// Skip the remaining rows (logged at debug level).
    #[default]
    Discard,
    /// Fail with [`RowbindError::UnexpectedRows`](crate::RowbindError::UnexpectedRows).
    Reject,
}

/// Configuration for a [`Loader`](super::Loader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Policy for surplus rows on scalar/record and single-row loads.
    #[serde(default)]
    pub extra_rows: ExtraRows,
    /// Retention of the loader's own tag store.
    #[serde(default)]
    pub cache: CacheRetention,
}

impl LoaderConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the surplus-row policy.
    #[must_use]
    pub fn with_extra_rows(mut self, extra_rows: ExtraRows) -> Self {
        self.extra_rows = extra_rows;
        self
    }

    /// Sets the tag store retention.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheRetention) -> Self {
        self.cache = cache;
        self
    }
}
