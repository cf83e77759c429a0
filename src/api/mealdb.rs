//! TheMealDB Client
//!
//! HTTP implementation of the recipe API against a TheMealDB-compatible
//! endpoint layout. Responses are decoded as raw JSON and converted to
//! domain entities here; the numbered strIngredientN/strMeasureN columns
//! make derived deserialization a poor fit.

use async_trait::async_trait;
use serde_json::Value;

use super::MealLookup;
use crate::domain::{Category, DomainError, DomainResult, Ingredient, Meal};

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// The API exposes ingredient slots 1..=20 on every full meal record
const INGREDIENT_SLOTS: usize = 20;

/// HTTP client for a TheMealDB-compatible recipe API
pub struct MealDbClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for MealDbClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn fetch(&self, path: &str, query: &[(&str, &str)]) -> DomainResult<Value> {
        self.http
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| DomainError::Network(e.to_string()))?
            .json::<Value>()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))
    }

    async fn fetch_meals(&self, path: &str, query: &[(&str, &str)]) -> DomainResult<Vec<Meal>> {
        let body = self.fetch(path, query).await?;
        Ok(meals_from_value(&body))
    }

    /// Free-text search by meal name
    pub async fn search(&self, name: &str) -> DomainResult<Vec<Meal>> {
        self.fetch_meals("search.php", &[("s", name)]).await
    }

    /// All browse categories
    pub async fn categories(&self) -> DomainResult<Vec<Category>> {
        let body = self.fetch("categories.php", &[]).await?;
        Ok(categories_from_value(&body))
    }

    /// Partial meal records (id, name, thumb) within one category
    pub async fn filter_by_category(&self, category: &str) -> DomainResult<Vec<Meal>> {
        self.fetch_meals("filter.php", &[("c", category)]).await
    }

    /// A single random meal
    pub async fn random(&self) -> DomainResult<Option<Meal>> {
        let mut meals = self.fetch_meals("random.php", &[]).await?;
        Ok(if meals.is_empty() {
            None
        } else {
            Some(meals.remove(0))
        })
    }
}

#[async_trait]
impl MealLookup for MealDbClient {
    async fn get_by_id(&self, id: &str) -> DomainResult<Vec<Meal>> {
        self.fetch_meals("lookup.php", &[("i", id)]).await
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Convert one API meal object into a domain `Meal`
///
/// A missing or null idMeal becomes an empty id: the record still renders
/// but cannot be favorited.
pub(crate) fn meal_from_value(value: &Value) -> Meal {
    let mut meal = Meal::new(
        text_field(value, "idMeal").unwrap_or_default(),
        text_field(value, "strMeal").unwrap_or_default(),
    );
    meal.thumb = text_field(value, "strMealThumb");
    meal.category = text_field(value, "strCategory");
    meal.area = text_field(value, "strArea");
    meal.instructions = text_field(value, "strInstructions");
    meal.youtube = text_field(value, "strYoutube");

    for slot in 1..=INGREDIENT_SLOTS {
        let Some(name) = text_field(value, &format!("strIngredient{}", slot)) else {
            continue;
        };
        let measure = text_field(value, &format!("strMeasure{}", slot)).unwrap_or_default();
        meal.ingredients.push(Ingredient { name, measure });
    }
    meal
}

/// Decode a `{"meals": [...] | null}` body; null means no results
pub(crate) fn meals_from_value(body: &Value) -> Vec<Meal> {
    body.get("meals")
        .and_then(Value::as_array)
        .map(|meals| meals.iter().map(meal_from_value).collect())
        .unwrap_or_default()
}

fn categories_from_value(body: &Value) -> Vec<Category> {
    body.get("categories")
        .and_then(Value::as_array)
        .map(|categories| {
            categories
                .iter()
                .map(|c| Category {
                    id: text_field(c, "idCategory").unwrap_or_default(),
                    name: text_field(c, "strCategory").unwrap_or_default(),
                    thumb: text_field(c, "strCategoryThumb"),
                    description: text_field(c, "strCategoryDescription"),
                })
                .collect()
        })
        .unwrap_or_default()
}
