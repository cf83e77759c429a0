//! Recipe API Layer
//!
//! Client for the remote food-data API. The lookup seam is a trait so
//! the favorites subsystem can be driven against a stub in tests.

mod mealdb;

use async_trait::async_trait;

use crate::domain::{DomainResult, Meal};

pub use mealdb::{MealDbClient, DEFAULT_BASE_URL};

/// Resolves a meal id to zero or more records
///
/// The API logically holds at most one meal per id, but the response
/// shape is a list and callers must tolerate zero or more.
#[async_trait]
pub trait MealLookup: Send + Sync {
    async fn get_by_id(&self, id: &str) -> DomainResult<Vec<Meal>>;
}
