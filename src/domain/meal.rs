//! Meal Entity
//!
//! A remotely-sourced dish record. Meals are immutable once fetched and
//! owned by whichever screen fetched them; they are never stored locally.

use serde::{Deserialize, Serialize};

/// One ingredient line of a meal (name + free-text measure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

/// A dish record from the recipe API
///
/// `id` is required for favoriting; an empty id means the record cannot
/// be favorited. List endpoints return partial records (id, name, thumb
/// only), so everything else is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    /// Thumbnail image URL
    pub thumb: Option<String>,
    pub category: Option<String>,
    /// Cuisine/region, e.g. "Italian"
    pub area: Option<String>,
    pub instructions: Option<String>,
    /// Link to a video walkthrough
    pub youtube: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

impl Meal {
    /// Create a minimal meal record (as list endpoints return them)
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumb: None,
            category: None,
            area: None,
            instructions: None,
            youtube: None,
            ingredients: Vec::new(),
        }
    }

    /// Whether this record carries the id required for favoriting
    pub fn can_favorite(&self) -> bool {
        !self.id.is_empty()
    }
}

/// A meal category (browse facet on the home screen)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub thumb: Option<String>,
    pub description: Option<String>,
}
