//! In-memory implementation of the redirect table.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::json;

use crate::domain::entities::RedirectFields;
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;

#[derive(Debug)]
struct Row {
    seq: u64,
    fields: RedirectFields,
}

#[derive(Debug, Default)]
struct Table {
    next_seq: u64,
    rows: HashMap<String, Row>,
}

/// Insertion-ordered redirect table held in process memory.
///
/// Each row remembers the sequence number it was inserted with; listings sort
/// by it, so replacing a record keeps its position. Not durable.
#[derive(Debug, Default)]
pub struct MemoryRedirectRepository {
    table: RwLock<Table>,
}

impl MemoryRedirectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous membership check for callers already holding their own lock.
    pub(crate) fn is_stored(&self, key: &str) -> bool {
        self.table.read().rows.contains_key(key)
    }
}

#[async_trait]
impl RedirectRepository for MemoryRedirectRepository {
    async fn insert(&self, key: &str, fields: RedirectFields) -> Result<(), AppError> {
        let mut table = self.table.write();
        if table.rows.contains_key(key) {
            return Err(AppError::conflict(
                "Key already exists.",
                json!({ "key": key }),
            ));
        }

        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.insert(key.to_string(), Row { seq, fields });
        Ok(())
    }

    async fn replace(&self, key: &str, fields: RedirectFields) -> Result<(), AppError> {
        let mut table = self.table.write();
        match table.rows.get_mut(key) {
            Some(row) => {
                row.fields = fields;
                Ok(())
            }
            None => Err(AppError::not_found(
                "Key does not exist.",
                json!({ "key": key }),
            )),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<RedirectFields>, AppError> {
        Ok(self.table.read().rows.get(key).map(|row| row.fields.clone()))
    }

    async fn contains(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.is_stored(key))
    }

    async fn remove(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.table.write().rows.remove(key).is_some())
    }

    async fn list(&self) -> Result<Vec<(String, RedirectFields)>, AppError> {
        let table = self.table.read();
        let mut rows: Vec<(u64, String, RedirectFields)> = table
            .rows
            .iter()
            .map(|(key, row)| (row.seq, key.clone(), row.fields.clone()))
            .collect();
        drop(table);

        rows.sort_unstable_by_key(|(seq, _, _)| *seq);
        Ok(rows
            .into_iter()
            .map(|(_, key, fields)| (key, fields))
            .collect())
    }
}
