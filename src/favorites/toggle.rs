//! Favorite Toggle Controller
//!
//! Per-recipe favorite state. The boolean flips optimistically on
//! toggle; the store write follows, and a failed write reverts the flip
//! and surfaces the error so the screen can offer a retry.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{DomainResult, Meal};
use crate::repository::FavoriteStore;

pub struct FavoriteToggle {
    store: Arc<dyn FavoriteStore>,
    user_id: String,
    meal_id: String,
    state: watch::Sender<bool>,
}

impl FavoriteToggle {
    /// Associate a (user, recipe) pair and run the initial existence check
    ///
    /// State defaults to "not favorite" and stays there if the check
    /// cannot run (no meal id) or fails.
    pub async fn bind(
        store: Arc<dyn FavoriteStore>,
        user_id: impl Into<String>,
        meal: &Meal,
    ) -> Self {
        let user_id = user_id.into();
        let meal_id = meal.id.clone();
        let (state, _) = watch::channel(false);

        if meal.can_favorite() {
            match store.exists(&user_id, &meal_id).await {
                Ok(found) => {
                    state.send_replace(found);
                }
                Err(e) => {
                    log::warn!("Favorite check failed for meal {}: {}", meal_id, e);
                }
            }
        }

        Self {
            store,
            user_id,
            meal_id,
            state,
        }
    }

    pub fn is_favorite(&self) -> bool {
        *self.state.borrow()
    }

    /// Observe the favorite boolean, including optimistic flips
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Flip the favorite state and persist the change
    ///
    /// Returns the settled state. A record without a meal id cannot be
    /// favorited; toggling it is ignored.
    pub async fn toggle(&self) -> DomainResult<bool> {
        if self.meal_id.is_empty() {
            log::debug!("Ignoring toggle for meal without id");
            return Ok(self.is_favorite());
        }

        let now_favorite = !self.is_favorite();
        self.state.send_replace(now_favorite);

        let write = if now_favorite {
            self.store.add(&self.user_id, &self.meal_id).await
        } else {
            self.store.remove(&self.user_id, &self.meal_id).await
        };

        if let Err(e) = write {
            self.state.send_replace(!now_favorite);
            log::error!(
                "Favorite write failed for meal {}, reverting: {}",
                self.meal_id,
                e
            );
            return Err(e);
        }

        Ok(now_favorite)
    }
}
