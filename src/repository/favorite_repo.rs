//! Favorite Repository
//!
//! SQLite-backed implementation of the favorites document collection.

use async_trait::async_trait;
use libsql::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::traits::FavoriteStore;
use crate::domain::{DomainError, DomainResult, FavoriteRecord};

/// SQLite implementation of the favorites store
pub struct FavoriteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FavoriteRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

fn row_to_favorite(row: &libsql::Row) -> DomainResult<FavoriteRecord> {
    let user_id = row
        .get::<String>(0)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let meal_id = row
        .get::<String>(1)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let mut record = FavoriteRecord::new(user_id, meal_id);
    record.created_at = row.get::<i64>(2).ok();
    Ok(record)
}

#[async_trait]
impl FavoriteStore for FavoriteRepository {
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<FavoriteRecord>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                "SELECT user_id, meal_id, CAST(created_at AS INTEGER) as created_at
                 FROM favorites WHERE user_id = ? ORDER BY id ASC",
                libsql::params![user_id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut records = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            records.push(row_to_favorite(&row)?);
        }
        Ok(records)
    }

    async fn exists(&self, user_id: &str, meal_id: &str) -> DomainResult<bool> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                "SELECT 1 FROM favorites WHERE user_id = ? AND meal_id = ? LIMIT 1",
                libsql::params![user_id, meal_id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(matches!(rows.next().await, Ok(Some(_))))
    }

    async fn add(&self, user_id: &str, meal_id: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        let now = chrono::Local::now().timestamp_millis();
        conn.execute(
            "INSERT OR IGNORE INTO favorites (user_id, meal_id, created_at) VALUES (?, ?, ?)",
            libsql::params![user_id, meal_id, now],
        )
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn remove(&self, user_id: &str, meal_id: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "DELETE FROM favorites WHERE user_id = ? AND meal_id = ?",
            libsql::params![user_id, meal_id],
        )
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(())
    }
}
