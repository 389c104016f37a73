//! Redirect resolution and bookkeeping.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Redirect, RedirectEntry, RedirectFields};
use crate::domain::repositories::{RedirectRepository, StatsRepository};
use crate::domain::rewrite::{apply_regex, compile_pattern};
use crate::error::AppError;

/// Outcome of resolving a requested slug to a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Key the request matched: the slug itself, or the stored pattern.
    pub key: String,
    /// Final destination, with capture groups substituted for pattern records.
    pub location: String,
    pub permanent: bool,
}

/// Owns the redirect table and the hit-counter table.
///
/// All validation, defaulting and lookup policy lives here; the repositories
/// only persist. One instance is built at startup and shared through
/// [`crate::state::AppState`].
///
/// # Pattern resolution order
///
/// Pattern records are scanned in the redirect table's insertion order and the
/// first matching pattern wins. When several patterns match the same slug, the
/// one added earliest is used. This is deliberate and must not be replaced by
/// any other ordering.
pub struct RedirectStore<R: ?Sized, S: ?Sized> {
    redirects: Arc<R>,
    stats: Arc<S>,
}

impl<R, S> RedirectStore<R, S>
where
    R: RedirectRepository + ?Sized,
    S: StatsRepository + ?Sized,
{
    /// Creates a store over the given storage engine.
    pub fn new(redirects: Arc<R>, stats: Arc<S>) -> Self {
        Self { redirects, stats }
    }

    /// Adds a redirect under a key that does not exist yet.
    ///
    /// The record is normalized and validated before it is persisted. Pattern
    /// records must also have a key that compiles as a regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `key` already exists (exact match).
    /// Returns [`AppError::Validation`] if the record or pattern is invalid.
    pub async fn add(&self, key: &str, fields: RedirectFields) -> Result<Redirect, AppError> {
        if self.has(key).await? {
            return Err(AppError::conflict(
                "Key already exists.",
                json!({ "key": key }),
            ));
        }

        let redirect = Redirect::try_from(fields)?;
        if redirect.allow_regex {
            compile_pattern(key)?;
        }

        self.redirects.insert(key, redirect.clone().into()).await?;
        info!(key, url = %redirect.url, allow_regex = redirect.allow_regex, "Redirect added");

        Ok(redirect)
    }

    /// Merges `patch` over an existing redirect and persists the result.
    ///
    /// Fields absent from `patch` keep their stored values. An invalid merged
    /// record leaves the stored one untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `key` does not exist (exact match).
    /// Returns [`AppError::Validation`] if the merged record is invalid.
    pub async fn update(&self, key: &str, patch: RedirectFields) -> Result<Redirect, AppError> {
        let stored = self.redirects.get(key).await?.ok_or_else(|| {
            AppError::not_found("Key does not exist.", json!({ "key": key }))
        })?;

        let redirect = Redirect::try_from(stored.normalize().merge(patch))?;
        if redirect.allow_regex {
            compile_pattern(key)?;
        }

        self.redirects.replace(key, redirect.clone().into()).await?;
        info!(key, url = %redirect.url, "Redirect updated");

        Ok(redirect)
    }

    /// Exact-match lookup of a normalized record.
    pub async fn get(&self, key: &str) -> Result<Option<Redirect>, AppError> {
        Ok(self
            .redirects
            .get(key)
            .await?
            .map(Redirect::from_stored))
    }

    /// Exact-match existence check.
    pub async fn has(&self, key: &str) -> Result<bool, AppError> {
        self.redirects.contains(key).await
    }

    /// Whether `key` resolves to anything, exactly or through a pattern.
    ///
    /// Cheaper check than [`Self::find`]: it does not materialize the record.
    pub async fn exists(&self, key: &str) -> Result<bool, AppError> {
        if self.has(key).await? {
            return Ok(true);
        }

        let records = self.redirects.list().await?;
        Ok(first_pattern_match(records, key).is_some())
    }

    /// Resolves `requested` to a redirect.
    ///
    /// An exact key wins. Otherwise the first pattern record (in insertion
    /// order) whose key matches `requested` is returned, with the entry's key
    /// set to the stored pattern. Stored patterns that fail to compile are
    /// skipped.
    pub async fn find(&self, requested: &str) -> Result<Option<RedirectEntry>, AppError> {
        if let Some(redirect) = self.get(requested).await? {
            debug!(key = requested, "Exact redirect match");
            return Ok(Some(RedirectEntry::new(requested, redirect)));
        }

        let records = self.redirects.list().await?;
        match first_pattern_match(records, requested) {
            Some((pattern, fields)) => {
                debug!(requested, pattern = %pattern, "Pattern redirect match");
                let redirect = Redirect::from_stored(fields);
                Ok(Some(RedirectEntry::new(pattern, redirect)))
            }
            None => Ok(None),
        }
    }

    /// Finds the redirect for `requested` and computes its final location.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a pattern rewrite does not produce an
    /// absolute URL.
    pub async fn resolve(&self, requested: &str) -> Result<Option<Resolution>, AppError> {
        let Some(entry) = self.find(requested).await? else {
            return Ok(None);
        };

        let location = if entry.redirect.allow_regex {
            apply_regex(&entry.key, &entry.redirect.url, requested)?
        } else {
            entry.redirect.url
        };

        Ok(Some(Resolution {
            key: entry.key,
            location,
            permanent: entry.redirect.permanent,
        }))
    }

    /// Removes a redirect and its hit counter.
    ///
    /// Returns `Ok(false)` if no redirect was stored under `key`; the counter
    /// removal still runs so no orphan can survive.
    pub async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let removed = self.redirects.remove(key).await?;
        self.stats.remove(key).await?;

        if removed {
            info!(key, "Redirect deleted");
        }

        Ok(removed)
    }

    /// All redirects, normalized, in insertion order.
    pub async fn list(&self) -> Result<Vec<RedirectEntry>, AppError> {
        Ok(self
            .redirects
            .list()
            .await?
            .into_iter()
            .map(|(key, fields)| RedirectEntry::new(key, Redirect::from_stored(fields)))
            .collect())
    }

    /// Records one hit against `key` and returns the new count.
    ///
    /// `key` is the matched key from [`Self::find`], not the requested path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `key` is not an existing redirect.
    pub async fn hit(&self, key: &str) -> Result<u64, AppError> {
        self.require(key).await?;
        // The engine re-checks ownership atomically with the increment, so a
        // delete racing this call leaves no counter behind.
        let count = self.stats.increment(key).await?;
        debug!(key, count, "Hit recorded");
        Ok(count)
    }

    /// Current hit count for `key`, zero if it was never hit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `key` is not an existing redirect.
    pub async fn hits(&self, key: &str) -> Result<u64, AppError> {
        self.require(key).await?;
        self.stats.get(key).await
    }

    /// Snapshot of all hit counters.
    pub async fn stats(&self) -> Result<BTreeMap<String, u64>, AppError> {
        self.stats.all().await
    }

    async fn require(&self, key: &str) -> Result<(), AppError> {
        if self.has(key).await? {
            Ok(())
        } else {
            Err(AppError::not_found(
                "Key does not exist.",
                json!({ "key": key }),
            ))
        }
    }
}


/// First pattern record, in the given order, whose key matches `requested`.
fn first_pattern_match(
    records: Vec<(String, RedirectFields)>,
    requested: &str,
) -> Option<(String, RedirectFields)> {
    records
        .into_iter()
        .filter(|(_, fields)| fields.is_pattern())
        .find(|(pattern, _)| match compile_pattern(pattern) {
            Ok(regex) => regex.is_match(requested),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Skipping stored pattern that does not compile");
                false
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockRedirectRepository, MockStatsRepository};

    fn store(
        redirects: MockRedirectRepository,
        stats: MockStatsRepository,
    ) -> RedirectStore<MockRedirectRepository, MockStatsRepository> {
        RedirectStore::new(Arc::new(redirects), Arc::new(stats))
    }

    fn pattern(url: &str) -> RedirectFields {
        RedirectFields::to(url).allow_regex(true)
    }

    #[tokio::test]
    async fn test_add_persists_normalized_record() {
        let mut redirects = MockRedirectRepository::new();
        redirects
            .expect_contains()
            .withf(|key| key == "docs")
            .times(1)
            .returning(|_| Ok(false));
        redirects
            .expect_insert()
            .withf(|key, fields| {
                key == "docs"
                    && fields.url.as_deref() == Some("https://docs.example.com")
                    && fields.permanent == Some(true)
                    && fields.allow_regex == Some(false)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let store = store(redirects, MockStatsRepository::new());
        let redirect = store
            .add("docs", RedirectFields::to("https://docs.example.com"))
            .await
            .unwrap();

        assert!(redirect.permanent);
        assert!(!redirect.allow_regex);
    }

    #[tokio::test]
    async fn test_add_existing_key_conflicts() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_contains().times(1).returning(|_| Ok(true));
        redirects.expect_insert().times(0);

        let store = store(redirects, MockStatsRepository::new());
        let result = store
            .add("docs", RedirectFields::to("https://example.com"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_add_invalid_url_is_rejected() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_contains().times(1).returning(|_| Ok(false));
        redirects.expect_insert().times(0);

        let store = store(redirects, MockStatsRepository::new());
        let result = store.add("docs", RedirectFields::to("not a url")).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_add_pattern_must_compile() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_contains().times(1).returning(|_| Ok(false));
        redirects.expect_insert().times(0);

        let store = store(redirects, MockStatsRepository::new());
        let result = store.add("foo-(", pattern("https://example.com/$1")).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_add_literal_key_need_not_compile() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_contains().times(1).returning(|_| Ok(false));
        redirects.expect_insert().times(1).returning(|_, _| Ok(()));

        let store = store(redirects, MockStatsRepository::new());
        let result = store
            .add("foo-(", RedirectFields::to("https://example.com"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_key_not_found() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_get().times(1).returning(|_| Ok(None));
        redirects.expect_replace().times(0);

        let store = store(redirects, MockStatsRepository::new());
        let result = store
            .update("docs", RedirectFields::to("https://example.com"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_merges_over_stored_record() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_get().times(1).returning(|_| {
            Ok(Some(
                RedirectFields::to("https://old.example.com").permanent(false),
            ))
        });
        redirects
            .expect_replace()
            .withf(|key, fields| {
                key == "docs"
                    && fields.url.as_deref() == Some("https://new.example.com")
                    && fields.permanent == Some(false)
                    && fields.allow_regex == Some(false)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let store = store(redirects, MockStatsRepository::new());
        let redirect = store
            .update("docs", RedirectFields::to("https://new.example.com"))
            .await
            .unwrap();

        assert_eq!(redirect.url, "https://new.example.com");
        assert!(!redirect.permanent);
    }

    #[tokio::test]
    async fn test_update_invalid_merge_leaves_record() {
        let mut redirects = MockRedirectRepository::new();
        redirects
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(RedirectFields::to("https://example.com"))));
        redirects.expect_replace().times(0);

        let store = store(redirects, MockStatsRepository::new());
        let result = store
            .update("docs", RedirectFields::to("relative/path"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_normalizes_legacy_record() {
        let mut redirects = MockRedirectRepository::new();
        redirects
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(RedirectFields::to("https://example.com"))));

        let store = store(redirects, MockStatsRepository::new());
        let redirect = store.get("legacy").await.unwrap().unwrap();

        assert!(redirect.permanent);
        assert!(!redirect.allow_regex);
    }

    #[tokio::test]
    async fn test_find_exact_match_wins() {
        let mut redirects = MockRedirectRepository::new();
        redirects
            .expect_get()
            .withf(|key| key == "foo-1")
            .times(1)
            .returning(|_| Ok(Some(RedirectFields::to("https://exact.example.com"))));
        redirects.expect_list().times(0);

        let store = store(redirects, MockStatsRepository::new());
        let entry = store.find("foo-1").await.unwrap().unwrap();

        assert_eq!(entry.key, "foo-1");
        assert_eq!(entry.redirect.url, "https://exact.example.com");
    }

    #[tokio::test]
    async fn test_find_first_pattern_in_order_wins() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_get().times(1).returning(|_| Ok(None));
        redirects.expect_list().times(1).returning(|| {
            Ok(vec![
                ("foo".to_string(), RedirectFields::to("https://literal.example.com")),
                (r"^foo-\d+$".to_string(), pattern("https://first.example.com")),
                (r"^foo-(\d+)$".to_string(), pattern("https://second.example.com")),
            ])
        });

        let store = store(redirects, MockStatsRepository::new());
        let entry = store.find("foo-42").await.unwrap().unwrap();

        assert_eq!(entry.key, r"^foo-\d+$");
        assert_eq!(entry.redirect.url, "https://first.example.com");
    }

    #[tokio::test]
    async fn test_find_skips_non_pattern_and_broken_patterns() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_get().times(1).returning(|_| Ok(None));
        redirects.expect_list().times(1).returning(|| {
            Ok(vec![
                ("(".to_string(), pattern("https://broken.example.com")),
                (".*".to_string(), RedirectFields::to("https://literal.example.com")),
                ("^bar".to_string(), pattern("https://bar.example.com")),
            ])
        });

        let store = store(redirects, MockStatsRepository::new());
        let entry = store.find("bar-1").await.unwrap().unwrap();

        assert_eq!(entry.key, "^bar");
    }

    #[tokio::test]
    async fn test_find_no_match() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_get().times(1).returning(|_| Ok(None));
        redirects.expect_list().times(1).returning(|| {
            Ok(vec![(
                r"^foo-(\d+)$".to_string(),
                pattern("https://example.com/$1"),
            )])
        });

        let store = store(redirects, MockStatsRepository::new());
        assert!(store.find("bar-42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists_through_pattern() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_contains().times(1).returning(|_| Ok(false));
        redirects.expect_list().times(1).returning(|| {
            Ok(vec![(
                r"^foo-(\d+)$".to_string(),
                pattern("https://example.com/$1"),
            )])
        });

        let store = store(redirects, MockStatsRepository::new());
        assert!(store.exists("foo-42").await.unwrap());
    }

    #[tokio::test]
    async fn test_resolve_applies_capture_groups() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_get().times(1).returning(|_| Ok(None));
        redirects.expect_list().times(1).returning(|| {
            Ok(vec![(
                r"^foo-(\d+)$".to_string(),
                pattern("https://example.com/$1").permanent(false),
            )])
        });

        let store = store(redirects, MockStatsRepository::new());
        let resolution = store.resolve("foo-42").await.unwrap().unwrap();

        assert_eq!(
            resolution,
            Resolution {
                key: r"^foo-(\d+)$".to_string(),
                location: "https://example.com/42".to_string(),
                permanent: false,
            }
        );
    }

    #[tokio::test]
    async fn test_hit_requires_existing_key() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_contains().times(1).returning(|_| Ok(false));
        let mut stats = MockStatsRepository::new();
        stats.expect_increment().times(0);

        let store = store(redirects, stats);
        let result = store.hit("missing").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_hit_returns_incremented_count() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_contains().times(1).returning(|_| Ok(true));
        let mut stats = MockStatsRepository::new();
        stats
            .expect_increment()
            .withf(|key| key == "docs")
            .times(1)
            .returning(|_| Ok(3));

        let store = store(redirects, stats);
        assert_eq!(store.hit("docs").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_hit_racing_delete_is_not_found() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_contains().times(1).returning(|_| Ok(true));
        let mut stats = MockStatsRepository::new();
        stats.expect_increment().times(1).returning(|key| {
            Err(AppError::not_found(
                "Key does not exist.",
                json!({ "key": key }),
            ))
        });
        stats.expect_remove().times(0);

        let store = store(redirects, stats);
        assert!(matches!(
            store.hit("docs").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_hits_requires_existing_key() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_contains().times(1).returning(|_| Ok(false));
        let mut stats = MockStatsRepository::new();
        stats.expect_get().times(0);

        let store = store(redirects, stats);
        assert!(matches!(
            store.hits("missing").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_counter() {
        let mut redirects = MockRedirectRepository::new();
        redirects
            .expect_remove()
            .withf(|key| key == "docs")
            .times(1)
            .returning(|_| Ok(true));
        let mut stats = MockStatsRepository::new();
        stats
            .expect_remove()
            .withf(|key| key == "docs")
            .times(1)
            .returning(|_| Ok(()));

        let store = store(redirects, stats);
        assert!(store.delete("docs").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_noop() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_remove().times(1).returning(|_| Ok(false));
        let mut stats = MockStatsRepository::new();
        stats.expect_remove().times(1).returning(|_| Ok(()));

        let store = store(redirects, stats);
        assert!(!store.delete("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_keeps_order_and_normalizes() {
        let mut redirects = MockRedirectRepository::new();
        redirects.expect_list().times(1).returning(|| {
            Ok(vec![
                ("b".to_string(), RedirectFields::to("https://b.example.com")),
                ("a".to_string(), pattern("https://a.example.com").permanent(false)),
            ])
        });

        let store = store(redirects, MockStatsRepository::new());
        let entries = store.list().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "b");
        assert!(entries[0].redirect.permanent);
        assert_eq!(entries[1].key, "a");
        assert!(entries[1].redirect.allow_regex);
        assert!(!entries[1].redirect.permanent);
    }
}
