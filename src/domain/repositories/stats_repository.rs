//! Repository trait for per-key hit counters.

use std::collections::BTreeMap;

use crate::error::AppError;
use async_trait::async_trait;

/// Storage seam for the hit-counter table (`key -> count`).
///
/// Counters are created lazily by the first [`StatsRepository::increment`] and
/// removed together with the redirect they count.
///
/// # Concurrency
///
/// `increment` must be atomic per key: concurrent increments of the same key
/// never lose an update. No ordering is required across keys.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryStatsRepository`] - in-process, non-durable
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Ensures a counter exists for `key` (starting at zero) and adds one.
    ///
    /// Returns the post-increment value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the storage engine can tell the owning
    /// redirect no longer exists.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment(&self, key: &str) -> Result<u64, AppError>;

    /// Current count, or zero when no counter exists.
    async fn get(&self, key: &str) -> Result<u64, AppError>;

    /// Removes the counter for `key`. Absent counters are not an error.
    async fn remove(&self, key: &str) -> Result<(), AppError>;

    /// Snapshot of every counter.
    async fn all(&self) -> Result<BTreeMap<String, u64>, AppError>;
}
