//! User Repository
//!
//! Handles all user-related database operations. Credential hashes are
//! written once at sign-up and only ever read back for comparison.

use libsql::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, UserProfile};

pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Insert a new user; the email must not be taken
    pub async fn create(&self, profile: &UserProfile, credential_hash: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        // Check first so a taken email is a Conflict, not a driver error
        let mut rows = conn
            .query(
                "SELECT 1 FROM users WHERE email = ? LIMIT 1",
                libsql::params![profile.email.as_str()],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if let Ok(Some(_)) = rows.next().await {
            return Err(DomainError::Conflict(format!(
                "Email {} already registered",
                profile.email
            )));
        }

        let now = chrono::Local::now().timestamp_millis();
        conn.execute(
            "INSERT INTO users (id, email, display_name, credential_hash, created_at)
             VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                profile.id.as_str(),
                profile.email.as_str(),
                profile.display_name.clone(),
                credential_hash,
                now
            ],
        )
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserProfile>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                "SELECT id, email, display_name FROM users WHERE email = ?",
                libsql::params![email],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if let Ok(Some(row)) = rows.next().await {
            Ok(Some(row_to_profile(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Profile for the email if the stored hash matches, None otherwise
    pub async fn verify_credentials(
        &self,
        email: &str,
        credential_hash: &str,
    ) -> DomainResult<Option<UserProfile>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                "SELECT id, email, display_name FROM users
                 WHERE email = ? AND credential_hash = ?",
                libsql::params![email, credential_hash],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if let Ok(Some(row)) = rows.next().await {
            Ok(Some(row_to_profile(&row)?))
        } else {
            Ok(None)
        }
    }
}

fn row_to_profile(row: &libsql::Row) -> DomainResult<UserProfile> {
    let id = row
        .get::<String>(0)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let email = row
        .get::<String>(1)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let mut profile = UserProfile::new(id, email);
    profile.display_name = row.get::<String>(2).ok().filter(|s| !s.is_empty());
    Ok(profile)
}
