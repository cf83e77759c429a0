//! Repository Layer - Core Traits
//!
//! Defines the abstract interface over the favorites document collection.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;

use crate::domain::{DomainResult, FavoriteRecord};

/// Document collection of (user, meal) favorite pairs
///
/// The store is the source of truth: callers never cache membership and
/// re-query for every existence check.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// All favorite records for a user, in insertion order
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<FavoriteRecord>>;

    /// Whether a record exists for the pair
    async fn exists(&self, user_id: &str, meal_id: &str) -> DomainResult<bool>;

    /// Insert the pair (inserting an existing pair is a no-op)
    async fn add(&self, user_id: &str, meal_id: &str) -> DomainResult<()>;

    /// Delete the matching record(s)
    async fn remove(&self, user_id: &str, meal_id: &str) -> DomainResult<()>;
}
