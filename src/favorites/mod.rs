//! Favorites Subsystem
//!
//! The favorites list is derived state: a set of (user, meal) pairs in
//! the store, resolved against the recipe API and re-assembled on every
//! visit. Aggregation fans out one lookup per id; the toggle controller
//! owns the per-recipe favorite boolean.

mod aggregator;
mod toggle;

#[cfg(test)]
mod tests;

pub use aggregator::{FavoritesAggregator, FavoritesLoad, FavoritesSnapshot};
pub use toggle::FavoriteToggle;
