//! Database Connection and Setup
//!
//! Manages the SQLite database connection and migrations. A local file
//! path (or ":memory:" in tests) is expected; pointing the builder at a
//! Turso replica gives the cloud-synced store without code changes.

use libsql::{Builder, Connection, Database};
use std::path::Path;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Database state wrapper
pub struct DbState {
    db: Mutex<Option<Database>>,
    conn: Mutex<Option<Connection>>,
}

impl DbState {
    pub fn new() -> Self {
        Self {
            db: Mutex::new(None),
            conn: Mutex::new(None),
        }
    }

    /// Get a connection, if initialized
    pub async fn get_connection(&self) -> DomainResult<Connection> {
        let guard = self.conn.lock().await;
        if let Some(conn) = &*guard {
            return Ok(conn.clone());
        }
        Err(DomainError::Internal("Database not initialized".to_string()))
    }

    /// Drop the connection and database handles
    pub async fn close(&self) {
        self.conn.lock().await.take();
        self.db.lock().await.take();
    }
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize database with path
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| DomainError::InvalidInput("Invalid DB path".to_string()))?;

    let db = Builder::new_local(db_path_str)
        .build()
        .await
        .map_err(|e| DomainError::Internal(format!("Failed to build db: {}", e)))?;

    let conn = db
        .connect()
        .map_err(|e| DomainError::Internal(format!("Failed to connect: {}", e)))?;

    run_migrations(&conn).await?;

    let state = DbState::new();
    *state.db.lock().await = Some(db);
    *state.conn.lock().await = Some(conn);

    Ok(state)
}

/// Run database migrations
async fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            display_name TEXT,
            credential_hash TEXT NOT NULL,
            created_at INTEGER
        )",
        (),
    )
    .await
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS favorites (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            meal_id TEXT NOT NULL,
            created_at INTEGER
        )",
        (),
    )
    .await
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    // One record per (user, meal) pair; re-adding is a no-op
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_favorites_pair ON favorites(user_id, meal_id)",
        (),
    )
    .await
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    // Index for the per-user list query
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_favorites_user ON favorites(user_id)",
        (),
    )
    .await
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(())
}
