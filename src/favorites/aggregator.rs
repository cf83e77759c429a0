//! Favorites Aggregator
//!
//! Resolves a user's favorited meal ids into full records and publishes
//! the growing list after each resolution. Per-id lookups run as
//! independent tasks with no ordering guarantee between completions; the
//! shared accumulator is guarded by a mutex because completions land on
//! different runtime threads.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;

use crate::api::MealLookup;
use crate::auth::IdentityProvider;
use crate::domain::{DomainError, DomainResult, Meal};
use crate::repository::FavoriteStore;

/// Point-in-time view of an in-progress favorites load
///
/// `meals` grows in resolution order. `missing` collects ids that
/// resolved to zero records; they are dropped from the list and never
/// retried. `complete` flips once every requested id has resolved one
/// way or the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesSnapshot {
    pub meals: Vec<Meal>,
    pub missing: Vec<String>,
    pub complete: bool,
}

/// Builds favorites lists for users
pub struct FavoritesAggregator {
    store: Arc<dyn FavoriteStore>,
    lookup: Arc<dyn MealLookup>,
}

impl FavoritesAggregator {
    pub fn new(store: Arc<dyn FavoriteStore>, lookup: Arc<dyn MealLookup>) -> Self {
        Self { store, lookup }
    }

    /// Screen entry point: refuses to load without a logged-in user
    pub async fn load_for_session(
        &self,
        identity: &dyn IdentityProvider,
    ) -> DomainResult<FavoritesLoad> {
        let user_id = identity.current_user().ok_or(DomainError::NotLoggedIn)?;
        self.load(&user_id).await
    }

    /// Start resolving the user's favorites
    ///
    /// Returns immediately after the id list is fetched; resolutions
    /// stream into the returned handle's snapshot channel.
    pub async fn load(&self, user_id: &str) -> DomainResult<FavoritesLoad> {
        let records = self.store.list_for_user(user_id).await?;
        let meal_ids: Vec<String> = records.into_iter().map(|r| r.meal_id).collect();

        if meal_ids.is_empty() {
            log::info!("No favorite meals found for user {}", user_id);
            let (_, snapshot) = watch::channel(FavoritesSnapshot {
                complete: true,
                ..FavoritesSnapshot::default()
            });
            return Ok(FavoritesLoad {
                snapshot,
                tasks: JoinSet::new(),
            });
        }

        let (tx, snapshot) = watch::channel(FavoritesSnapshot::default());
        let progress = Arc::new(Mutex::new(Progress {
            snapshot: FavoritesSnapshot::default(),
            pending: meal_ids.len(),
            tx,
        }));

        let mut tasks = JoinSet::new();
        for meal_id in meal_ids {
            let lookup = Arc::clone(&self.lookup);
            let progress = Arc::clone(&progress);
            tasks.spawn(async move {
                let result = lookup.get_by_id(&meal_id).await;
                let mut progress = progress.lock().await;
                match result {
                    Ok(meals) if !meals.is_empty() => progress.resolved(meals),
                    Ok(_) => {
                        log::warn!("No meal found for id {}", meal_id);
                        progress.dropped(meal_id);
                    }
                    Err(e) => {
                        log::warn!("Meal lookup failed for id {}: {}", meal_id, e);
                        progress.dropped(meal_id);
                    }
                }
            });
        }

        Ok(FavoritesLoad { snapshot, tasks })
    }
}

/// Handle to one in-flight favorites load
///
/// Dropping the handle aborts outstanding lookups, so tying it to the
/// hosting screen's lifetime cancels the load on teardown.
pub struct FavoritesLoad {
    snapshot: watch::Receiver<FavoritesSnapshot>,
    tasks: JoinSet<()>,
}

impl FavoritesLoad {
    /// The most recently published snapshot
    pub fn latest(&self) -> FavoritesSnapshot {
        self.snapshot.borrow().clone()
    }

    /// A receiver for the display surface to render from
    pub fn subscribe(&self) -> watch::Receiver<FavoritesSnapshot> {
        self.snapshot.clone()
    }

    /// Wait until every resolution has landed
    pub async fn finished(&mut self) {
        while self.tasks.join_next().await.is_some() {}
    }
}

struct Progress {
    snapshot: FavoritesSnapshot,
    pending: usize,
    tx: watch::Sender<FavoritesSnapshot>,
}

impl Progress {
    fn resolved(&mut self, meals: Vec<Meal>) {
        self.snapshot.meals.extend(meals);
        self.publish();
    }

    fn dropped(&mut self, meal_id: String) {
        self.snapshot.missing.push(meal_id);
        self.publish();
    }

    fn publish(&mut self) {
        self.pending -= 1;
        self.snapshot.complete = self.pending == 0;
        self.tx.send_replace(self.snapshot.clone());
    }
}
