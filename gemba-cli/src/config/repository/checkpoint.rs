//! Repository for migration progress properties

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::migration::CheckpointStore;

/// A stored property with its last update time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

/// Get a property value by key
pub async fn get_property(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM properties WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to get property {}", key))?;

    Ok(row.map(|(value,)| value))
}

/// Insert or overwrite a property
pub async fn set_property(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO properties (key, value, updated_at)
         VALUES (?, ?, CURRENT_TIMESTAMP)
         ON CONFLICT(key)
         DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to set property {}", key))?;

    Ok(())
}

/// Delete a property. Returns whether it existed.
pub async fn delete_property(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM properties WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to delete property {}", key))?;

    Ok(result.rows_affected() > 0)
}

/// List all properties ordered by key
pub async fn list_properties(pool: &SqlitePool) -> Result<Vec<Property>> {
    let rows: Vec<(String, String, NaiveDateTime)> =
        sqlx::query_as("SELECT key, value, updated_at FROM properties ORDER BY key")
            .fetch_all(pool)
            .await
            .context("Failed to list properties")?;

    Ok(rows
        .into_iter()
        .map(|(key, value, updated_at)| Property {
            key,
            value,
            updated_at,
        })
        .collect())
}

/// Checkpoint store backed by the `properties` table
#[derive(Debug, Clone)]
pub struct SqliteCheckpointStore {
    pool: SqlitePool,
}

impl SqliteCheckpointStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCheckpointStore { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CheckpointStore for SqliteCheckpointStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        get_property(&self.pool, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        set_property(&self.pool, key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        delete_property(&self.pool, key).await?;
        Ok(())
    }
}
