//! Favorite Record
//!
//! A stored association between a user and a meal id. The favorites
//! store is the source of truth; nothing is cached client-side.

use serde::{Deserialize, Serialize};

/// A (user, meal) favorite pair as stored in the document collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub user_id: String,
    pub meal_id: String,
    /// Insertion timestamp (epoch millis), set by the store
    pub created_at: Option<i64>,
}

impl FavoriteRecord {
    pub fn new(user_id: impl Into<String>, meal_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            meal_id: meal_id.into(),
            created_at: None,
        }
    }
}
