//! Repository trait for the redirect table.

use crate::domain::entities::RedirectFields;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage seam for the redirect table (`key -> record`).
///
/// Implementations are plain read-through/write-through stores: they apply no
/// defaults and no validation, which is the job of
/// [`crate::application::services::RedirectStore`]. Records are returned as
/// stored, so legacy rows may leave flags unset.
///
/// # Ordering
///
/// [`RedirectRepository::list`] returns records in insertion order. Pattern
/// resolution relies on this for its first-match-wins tie break.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryRedirectRepository`] - in-process, non-durable
/// - [`crate::infrastructure::persistence::PgRedirectRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectRepository: Send + Sync {
    /// Inserts a record under a key that must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `key` is already stored.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, key: &str, fields: RedirectFields) -> Result<(), AppError>;

    /// Replaces the record stored under an existing key, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `key` is not stored.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn replace(&self, key: &str, fields: RedirectFields) -> Result<(), AppError>;

    /// Exact-match lookup.
    async fn get(&self, key: &str) -> Result<Option<RedirectFields>, AppError>;

    /// Exact-match existence check.
    async fn contains(&self, key: &str) -> Result<bool, AppError>;

    /// Removes a record. Returns `Ok(false)` if nothing was stored under `key`.
    async fn remove(&self, key: &str) -> Result<bool, AppError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<(String, RedirectFields)>, AppError>;
}
