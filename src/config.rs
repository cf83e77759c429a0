//! Application Configuration
//!
//! Environment-driven settings with logged fallbacks to defaults.

use std::env;
use std::path::PathBuf;

use crate::api::DEFAULT_BASE_URL;

const DEFAULT_DB_FILE: &str = "recipe_finder.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the recipe API
    pub api_base_url: String,
    /// Location of the local favorites/users database
    pub db_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_FILE),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env_or("RECIPE_API_URL", DEFAULT_BASE_URL),
            db_path: PathBuf::from(env_or("RECIPE_DB_PATH", DEFAULT_DB_FILE)),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            log::info!("{} not set, using default: {}", key, default);
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE));
    }
}
