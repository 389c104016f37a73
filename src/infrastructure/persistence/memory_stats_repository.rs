//! In-memory implementation of the hit-counter table.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use super::MemoryRedirectRepository;
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Hit counters held in process memory.
///
/// `DashMap` shards its locks, so an increment holds only the shard of its own
/// key: concurrent hits on one key serialize, hits on other keys do not wait.
/// Not durable.
///
/// When bound to a redirect table, a counter is only created while its record
/// is stored. The check runs under the shard lock, so a delete that removes
/// the record and then the counter can never be followed by a fresh counter.
#[derive(Debug, Default)]
pub struct MemoryStatsRepository {
    counters: DashMap<String, u64>,
    redirects: Option<Arc<MemoryRedirectRepository>>,
}

impl MemoryStatsRepository {
    /// Unbound counters: any key may be incremented.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters that refuse to start for keys missing from `redirects`.
    pub fn bound_to(redirects: Arc<MemoryRedirectRepository>) -> Self {
        Self {
            counters: DashMap::new(),
            redirects: Some(redirects),
        }
    }
}

#[async_trait]
impl StatsRepository for MemoryStatsRepository {
    async fn increment(&self, key: &str) -> Result<u64, AppError> {
        let mut count = match self.counters.entry(key.to_string()) {
            Entry::Occupied(entry) => entry.into_ref(),
            Entry::Vacant(entry) => {
                // Lock order is shard then table; delete never holds both.
                if let Some(redirects) = &self.redirects
                    && !redirects.is_stored(key)
                {
                    return Err(AppError::not_found(
                        "Key does not exist.",
                        json!({ "key": key }),
                    ));
                }
                entry.insert(0)
            }
        };
        *count += 1;
        Ok(*count)
    }

    async fn get(&self, key: &str) -> Result<u64, AppError> {
        Ok(self.counters.get(key).map(|c| *c).unwrap_or(0))
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.counters.remove(key);
        Ok(())
    }

    async fn all(&self) -> Result<BTreeMap<String, u64>, AppError> {
        Ok(self
            .counters
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RedirectFields;
    use crate::domain::repositories::RedirectRepository;

    #[tokio::test]
    async fn increment_starts_at_one() {
        let repo = MemoryStatsRepository::new();

        assert_eq!(repo.get("docs").await.unwrap(), 0);
        assert_eq!(repo.increment("docs").await.unwrap(), 1);
        assert_eq!(repo.increment("docs").await.unwrap(), 2);
        assert_eq!(repo.get("docs").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn remove_and_snapshot() {
        let repo = MemoryStatsRepository::new();

        repo.increment("a").await.unwrap();
        repo.increment("b").await.unwrap();
        repo.increment("b").await.unwrap();
        repo.remove("a").await.unwrap();
        repo.remove("never").await.unwrap();

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all["b"], 2);
    }

    #[tokio::test]
    async fn bound_counter_needs_stored_record() {
        let redirects = Arc::new(MemoryRedirectRepository::new());
        let repo = MemoryStatsRepository::bound_to(redirects.clone());

        let err = repo.increment("docs").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(repo.all().await.unwrap().is_empty());

        redirects
            .insert("docs", RedirectFields::to("https://example.com"))
            .await
            .unwrap();
        assert_eq!(repo.increment("docs").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn bound_counter_not_recreated_after_delete() {
        let redirects = Arc::new(MemoryRedirectRepository::new());
        let repo = MemoryStatsRepository::bound_to(redirects.clone());
        redirects
            .insert("docs", RedirectFields::to("https://example.com"))
            .await
            .unwrap();
        repo.increment("docs").await.unwrap();

        // Between the two halves of a delete the old counter still counts.
        assert!(redirects.remove("docs").await.unwrap());
        assert_eq!(repo.increment("docs").await.unwrap(), 2);
        repo.remove("docs").await.unwrap();

        let err = repo.increment("docs").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(repo.all().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        let repo = Arc::new(MemoryStatsRepository::new());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    for _ in 0..250 {
                        repo.increment("hot").await.unwrap();
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(repo.get("hot").await.unwrap(), 2000);
    }
}
