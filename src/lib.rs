//! Recipe Finder Core
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - api: Remote recipe API client
//! - auth: Session management over the user repository
//! - favorites: Aggregation and per-recipe toggle state
//! - navigation: Explicit screen routing
//!
//! Screens live in the host application; they observe state through the
//! watch channels exposed here and call the operations below.

use std::sync::Arc;

use tokio::sync::Mutex;

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod favorites;
pub mod navigation;
pub mod repository;

use api::{MealDbClient, MealLookup};
use auth::{AuthService, IdentityProvider};
use config::AppConfig;
use domain::{DomainError, DomainResult, Meal};
use favorites::{FavoriteToggle, FavoritesAggregator, FavoritesLoad};
use navigation::{Navigator, Screen};
use repository::{init_db, DbState, FavoriteRepository, FavoriteStore, UserRepository};

/// Application state shared across screens
pub struct App {
    pub config: AppConfig,
    pub db_state: DbState,
    pub auth: AuthService,
    pub meals: Arc<MealDbClient>,
    pub favorites: FavoritesAggregator,
    pub navigator: Navigator,
    favorite_store: Arc<dyn FavoriteStore>,
}

impl App {
    /// Open the database and wire every service
    pub async fn init(config: AppConfig) -> DomainResult<Self> {
        let db_state = init_db(&config.db_path).await?;
        let conn = Arc::new(Mutex::new(db_state.get_connection().await?));

        let favorite_store: Arc<dyn FavoriteStore> =
            Arc::new(FavoriteRepository::new(Arc::clone(&conn)));
        let meals = Arc::new(MealDbClient::new(config.api_base_url.clone()));
        let lookup: Arc<dyn MealLookup> = meals.clone();

        Ok(Self {
            favorites: FavoritesAggregator::new(Arc::clone(&favorite_store), lookup),
            auth: AuthService::new(UserRepository::new(conn)),
            navigator: Navigator::new(Screen::Login),
            favorite_store,
            meals,
            db_state,
            config,
        })
    }

    /// Start loading the logged-in user's favorites list
    pub async fn load_favorites(&self) -> DomainResult<FavoritesLoad> {
        self.favorites.load_for_session(&self.auth).await
    }

    /// Favorite state + toggle trigger for one displayed recipe
    pub async fn favorite_toggle(&self, meal: &Meal) -> DomainResult<FavoriteToggle> {
        let user_id = self.auth.current_user().ok_or(DomainError::NotLoggedIn)?;
        Ok(FavoriteToggle::bind(Arc::clone(&self.favorite_store), user_id, meal).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    async fn setup_app() -> App {
        let config = AppConfig {
            db_path: PathBuf::from(":memory:"),
            ..AppConfig::default()
        };
        App::init(config).await.expect("Failed to init app")
    }

    #[tokio::test]
    async fn test_favorites_require_login() {
        let app = setup_app().await;

        let result = app.load_favorites().await;
        assert!(matches!(result, Err(DomainError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_signed_up_user_can_toggle_and_list() {
        let app = setup_app().await;
        app.auth
            .sign_up("cook@example.com", "secret1", None)
            .await
            .expect("Sign up failed");

        let meal = Meal::new("52772", "Teriyaki Chicken Casserole");
        let toggle = app.favorite_toggle(&meal).await.expect("Bind failed");
        assert!(!toggle.is_favorite());
        assert!(toggle.toggle().await.expect("Toggle failed"));

        // Re-binding re-checks the store, not any cached state
        let rebound = app.favorite_toggle(&meal).await.unwrap();
        assert!(rebound.is_favorite());
    }

    #[tokio::test]
    async fn test_empty_favorites_load_completes_without_lookups() {
        let app = setup_app().await;
        app.auth
            .sign_up("cook@example.com", "secret1", None)
            .await
            .unwrap();

        let load = app.load_favorites().await.expect("Load failed");
        let snapshot = load.latest();
        assert!(snapshot.complete);
        assert!(snapshot.meals.is_empty());
    }
}
