//! PostgreSQL implementation of the hit-counter table.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// PostgreSQL repository for the `redirect_stats` table.
///
/// Increments are a single upsert, so concurrent hits on one key are
/// serialized by the row lock. The foreign key to `redirects` turns an
/// increment for a vanished redirect into [`AppError::NotFound`].
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn increment(&self, key: &str) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO redirect_stats (key, count)
            VALUES ($1, 1)
            ON CONFLICT (key) DO UPDATE SET count = redirect_stats.count + 1
            RETURNING count
            "#,
        )
        .bind(key)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn get(&self, key: &str) -> Result<u64, AppError> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT count FROM redirect_stats WHERE key = $1")
                .bind(key)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(count.unwrap_or(0).max(0) as u64)
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM redirect_stats WHERE key = $1")
            .bind(key)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn all(&self) -> Result<BTreeMap<String, u64>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as("SELECT key, count FROM redirect_stats")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(key, count)| (key, count.max(0) as u64))
            .collect())
    }
}
