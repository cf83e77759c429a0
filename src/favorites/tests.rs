//! Favorites Subsystem Tests
//!
//! Aggregator and toggle controller driven against in-memory doubles of
//! the recipe API and the favorites store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{FavoritesAggregator, FavoriteToggle};
use crate::api::MealLookup;
use crate::auth::IdentityProvider;
use crate::domain::{DomainError, DomainResult, FavoriteRecord, Meal};
use crate::repository::FavoriteStore;

#[derive(Default)]
struct StubLookup {
    meals: HashMap<String, Vec<Meal>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl StubLookup {
    fn with_meal(mut self, id: &str) -> Self {
        self.meals
            .insert(id.to_string(), vec![Meal::new(id, format!("Meal {}", id))]);
        self
    }

    fn with_meals(mut self, id: &str, meals: Vec<Meal>) -> Self {
        self.meals.insert(id.to_string(), meals);
        self
    }

    fn with_failure(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl MealLookup for StubLookup {
    async fn get_by_id(&self, id: &str) -> DomainResult<Vec<Meal>> {
        self.calls.lock().await.push(id.to_string());
        if self.failing.contains(id) {
            return Err(DomainError::Network("connection reset".to_string()));
        }
        Ok(self.meals.get(id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct MemoryStore {
    records: Mutex<Vec<FavoriteRecord>>,
    ops: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Seed records directly, duplicates allowed
    async fn seed(&self, user_id: &str, meal_ids: &[&str]) {
        let mut records = self.records.lock().await;
        for meal_id in meal_ids {
            records.push(FavoriteRecord::new(user_id, *meal_id));
        }
    }

    fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    async fn ops(&self) -> Vec<String> {
        self.ops.lock().await.clone()
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<FavoriteRecord>> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn exists(&self, user_id: &str, meal_id: &str) -> DomainResult<bool> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .any(|r| r.user_id == user_id && r.meal_id == meal_id))
    }

    async fn add(&self, user_id: &str, meal_id: &str) -> DomainResult<()> {
        self.ops.lock().await.push(format!("add:{}", meal_id));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Internal("store unavailable".to_string()));
        }
        let mut records = self.records.lock().await;
        if !records
            .iter()
            .any(|r| r.user_id == user_id && r.meal_id == meal_id)
        {
            records.push(FavoriteRecord::new(user_id, meal_id));
        }
        Ok(())
    }

    async fn remove(&self, user_id: &str, meal_id: &str) -> DomainResult<()> {
        self.ops.lock().await.push(format!("remove:{}", meal_id));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Internal("store unavailable".to_string()));
        }
        self.records
            .lock()
            .await
            .retain(|r| !(r.user_id == user_id && r.meal_id == meal_id));
        Ok(())
    }
}

/// Holds one id's lookup open until the test releases it
struct GatedLookup {
    gated_id: String,
    gate: Mutex<Option<tokio::sync::oneshot::Receiver<()>>>,
}

#[async_trait]
impl MealLookup for GatedLookup {
    async fn get_by_id(&self, id: &str) -> DomainResult<Vec<Meal>> {
        if id == self.gated_id {
            if let Some(gate) = self.gate.lock().await.take() {
                let _ = gate.await;
            }
        }
        Ok(vec![Meal::new(id, format!("Meal {}", id))])
    }
}

struct StubIdentity(Option<String>);

impl IdentityProvider for StubIdentity {
    fn current_user(&self) -> Option<String> {
        self.0.clone()
    }
}

fn meal_ids(meals: &[Meal]) -> HashSet<String> {
    meals.iter().map(|m| m.id.clone()).collect()
}

#[tokio::test]
async fn test_no_favorites_means_no_lookups() {
    let store = Arc::new(MemoryStore::default());
    let lookup = Arc::new(StubLookup::default());
    let aggregator = FavoritesAggregator::new(store, lookup.clone());

    let load = aggregator.load("u1").await.expect("Load failed");

    let snapshot = load.latest();
    assert!(snapshot.complete);
    assert!(snapshot.meals.is_empty());
    assert!(lookup.calls().await.is_empty());
}

#[tokio::test]
async fn test_all_resolutions_succeeding_yields_all_meals() {
    let store = Arc::new(MemoryStore::default());
    store.seed("u1", &["52772", "52773", "52804"]).await;
    let lookup = Arc::new(
        StubLookup::default()
            .with_meal("52772")
            .with_meal("52773")
            .with_meal("52804"),
    );
    let aggregator = FavoritesAggregator::new(store, lookup);

    let mut load = aggregator.load("u1").await.expect("Load failed");
    load.finished().await;

    let snapshot = load.latest();
    assert!(snapshot.complete);
    assert!(snapshot.missing.is_empty());
    // Completion order is unspecified, so compare as sets
    assert_eq!(
        meal_ids(&snapshot.meals),
        HashSet::from(["52772".to_string(), "52773".to_string(), "52804".to_string()])
    );
}

#[tokio::test]
async fn test_zero_result_resolution_is_dropped_and_recorded() {
    let store = Arc::new(MemoryStore::default());
    store.seed("u1", &["52772", "52773", "52804"]).await;
    // 52773 resolves to zero records
    let lookup = Arc::new(StubLookup::default().with_meal("52772").with_meal("52804"));
    let aggregator = FavoritesAggregator::new(store, lookup);

    let mut load = aggregator.load("u1").await.unwrap();
    load.finished().await;

    let snapshot = load.latest();
    assert_eq!(snapshot.meals.len(), 2);
    assert_eq!(snapshot.missing, vec!["52773".to_string()]);
    assert!(snapshot.complete);
}

#[tokio::test]
async fn test_mixed_success_and_failure_scenario() {
    let store = Arc::new(MemoryStore::default());
    store.seed("u1", &["52772", "52773"]).await;
    let lookup = Arc::new(StubLookup::default().with_meal("52772").with_failure("52773"));
    let aggregator = FavoritesAggregator::new(store, lookup);

    let mut load = aggregator.load("u1").await.unwrap();
    load.finished().await;

    let snapshot = load.latest();
    assert_eq!(snapshot.meals.len(), 1);
    assert_eq!(snapshot.meals[0].id, "52772");
    assert_eq!(snapshot.missing, vec!["52773".to_string()]);
}

#[tokio::test]
async fn test_multi_record_resolution_appends_all() {
    let store = Arc::new(MemoryStore::default());
    store.seed("u1", &["52772"]).await;
    let lookup = Arc::new(StubLookup::default().with_meals(
        "52772",
        vec![Meal::new("52772", "Casserole"), Meal::new("52772-b", "Variant")],
    ));
    let aggregator = FavoritesAggregator::new(store, lookup);

    let mut load = aggregator.load("u1").await.unwrap();
    load.finished().await;

    assert_eq!(load.latest().meals.len(), 2);
}

#[tokio::test]
async fn test_repeated_ids_are_not_deduplicated() {
    let store = Arc::new(MemoryStore::default());
    store.seed("u1", &["52772", "52772"]).await;
    let lookup = Arc::new(StubLookup::default().with_meal("52772"));
    let aggregator = FavoritesAggregator::new(store, lookup.clone());

    let mut load = aggregator.load("u1").await.unwrap();
    load.finished().await;

    assert_eq!(lookup.calls().await.len(), 2);
    assert_eq!(load.latest().meals.len(), 2);
}

#[tokio::test]
async fn test_snapshots_stream_incrementally() {
    let store = Arc::new(MemoryStore::default());
    store.seed("u1", &["52772", "52773"]).await;
    // 52773's lookup stays open until the test has seen 52772 land
    let (release, gate) = tokio::sync::oneshot::channel();
    let lookup = Arc::new(GatedLookup {
        gated_id: "52773".to_string(),
        gate: Mutex::new(Some(gate)),
    });
    let aggregator = FavoritesAggregator::new(store, lookup);

    let mut load = aggregator.load("u1").await.unwrap();
    let mut snapshots = load.subscribe();

    snapshots.changed().await.expect("Missed first publish");
    {
        let partial = snapshots.borrow_and_update();
        assert_eq!(partial.meals.len(), 1);
        assert_eq!(partial.meals[0].id, "52772");
        assert!(!partial.complete);
    }

    release.send(()).expect("Lookup task went away");
    load.finished().await;

    let snapshot = load.latest();
    assert!(snapshot.complete);
    assert_eq!(snapshot.meals.len(), 2);
}

#[tokio::test]
async fn test_load_for_session_requires_login() {
    let store = Arc::new(MemoryStore::default());
    let lookup = Arc::new(StubLookup::default());
    let aggregator = FavoritesAggregator::new(store, lookup);

    let result = aggregator.load_for_session(&StubIdentity(None)).await;
    assert!(matches!(result, Err(DomainError::NotLoggedIn)));

    let result = aggregator
        .load_for_session(&StubIdentity(Some("u1".to_string())))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_existence_check_initializes_toggle_state() {
    let store = Arc::new(MemoryStore::default());
    store.seed("u1", &["52772"]).await;

    let favorited = FavoriteToggle::bind(store.clone(), "u1", &Meal::new("52772", "Casserole")).await;
    assert!(favorited.is_favorite());

    let other = FavoriteToggle::bind(store, "u1", &Meal::new("52773", "Salmon")).await;
    assert!(!other.is_favorite());
}

#[tokio::test]
async fn test_toggle_twice_returns_to_initial_state() {
    let store = Arc::new(MemoryStore::default());
    let toggle = FavoriteToggle::bind(store.clone(), "u1", &Meal::new("52772", "Casserole")).await;
    assert!(!toggle.is_favorite());

    assert!(toggle.toggle().await.unwrap());
    assert!(!toggle.toggle().await.unwrap());

    assert!(!toggle.is_favorite());
    assert_eq!(
        store.ops().await,
        vec!["add:52772".to_string(), "remove:52772".to_string()]
    );
    assert!(!store.exists("u1", "52772").await.unwrap());
}

#[tokio::test]
async fn test_toggle_without_meal_id_is_ignored() {
    let store = Arc::new(MemoryStore::default());
    let toggle = FavoriteToggle::bind(store.clone(), "u1", &Meal::new("", "Mystery Dish")).await;

    let result = toggle.toggle().await.expect("Toggle errored");

    assert!(!result);
    assert!(store.ops().await.is_empty());
}

#[tokio::test]
async fn test_failed_write_reverts_optimistic_flip() {
    let store = Arc::new(MemoryStore::default());
    let toggle = FavoriteToggle::bind(store.clone(), "u1", &Meal::new("52772", "Casserole")).await;
    store.fail_writes();

    let result = toggle.toggle().await;

    assert!(matches!(result, Err(DomainError::Internal(_))));
    assert!(!toggle.is_favorite());
    assert_eq!(store.ops().await, vec!["add:52772".to_string()]);
}

#[tokio::test]
async fn test_optimistic_flip_is_visible_to_subscribers() {
    let store = Arc::new(MemoryStore::default());
    let toggle = FavoriteToggle::bind(store, "u1", &Meal::new("52772", "Casserole")).await;
    let subscription = toggle.subscribe();

    toggle.toggle().await.unwrap();

    assert!(*subscription.borrow());
}
