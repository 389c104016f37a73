//! PostgreSQL implementation of the redirect table.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::RedirectFields;
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct RedirectRow {
    key: String,
    url: String,
    permanent: Option<bool>,
    allow_regex: Option<bool>,
}

impl From<RedirectRow> for (String, RedirectFields) {
    fn from(row: RedirectRow) -> Self {
        (
            row.key,
            RedirectFields {
                url: Some(row.url),
                permanent: row.permanent,
                allow_regex: row.allow_regex,
            },
        )
    }
}

/// PostgreSQL repository for the `redirects` table.
///
/// Insertion order is the `BIGSERIAL` id; updates keep the id so a record
/// never moves in pattern resolution order.
pub struct PgRedirectRepository {
    pool: Arc<PgPool>,
}

impl PgRedirectRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedirectRepository for PgRedirectRepository {
    async fn insert(&self, key: &str, fields: RedirectFields) -> Result<(), AppError> {
        let url = fields.url.ok_or_else(|| {
            AppError::bad_request("Redirect must have a URL.", json!({ "field": "url" }))
        })?;

        sqlx::query(
            r#"
            INSERT INTO redirects (key, url, permanent, allow_regex)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(key)
        .bind(url)
        .bind(fields.permanent)
        .bind(fields.allow_regex)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn replace(&self, key: &str, fields: RedirectFields) -> Result<(), AppError> {
        let url = fields.url.ok_or_else(|| {
            AppError::bad_request("Redirect must have a URL.", json!({ "field": "url" }))
        })?;

        let result = sqlx::query(
            r#"
            UPDATE redirects
            SET url = $2, permanent = $3, allow_regex = $4
            WHERE key = $1
            "#,
        )
        .bind(key)
        .bind(url)
        .bind(fields.permanent)
        .bind(fields.allow_regex)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Key does not exist.",
                json!({ "key": key }),
            ));
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<RedirectFields>, AppError> {
        let row = sqlx::query_as::<_, RedirectRow>(
            "SELECT key, url, permanent, allow_regex FROM redirects WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| <(String, RedirectFields)>::from(r).1))
    }

    async fn contains(&self, key: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM redirects WHERE key = $1)")
                .bind(key)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn remove(&self, key: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM redirects WHERE key = $1")
            .bind(key)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<(String, RedirectFields)>, AppError> {
        let rows = sqlx::query_as::<_, RedirectRow>(
            "SELECT key, url, permanent, allow_regex FROM redirects ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
