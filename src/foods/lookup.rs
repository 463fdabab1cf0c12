//! External food catalogue (USDA FoodData Central).
//!
//! The rest of the crate only sees [`FoodLookup`]; search results are cached
//! in-process per lower-cased query.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::config::UsdaConfig;
use crate::nutrients::aggregate::NutrientValues;
use crate::nutrients::key::NutrientKey;

/// Nutrient content of one reference serving of a food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub fdc_id: i64,
    pub name: String,
    pub nutrients: NutrientValues,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("food {0} not found")]
    NotFound(i64),
    #[error("food lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("food lookup returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait FoodLookup: Send + Sync {
    async fn search_foods(&self, query: &str) -> Result<Vec<FoodItem>, LookupError>;
    async fn lookup_food_by_external_id(&self, fdc_id: i64) -> Result<FoodItem, LookupError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    fdc_id: i64,
    description: String,
    food_category: Option<String>,
    brand_name: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<SearchNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNutrient {
    nutrient_name: Option<String>,
    unit_name: Option<String>,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailFood {
    fdc_id: i64,
    description: String,
    brand_name: Option<String>,
    food_category: Option<Category>,
    branded_food_category: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<DetailNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Category {
    Name(String),
    Described { description: String },
}

#[derive(Debug, Deserialize)]
struct DetailNutrient {
    nutrient: Option<NutrientInfo>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientInfo {
    name: String,
    unit_name: Option<String>,
}

/// Maps a FoodData Central nutrient name to a tracked nutrient.
fn usda_key(name: &str, unit: Option<&str>) -> Option<NutrientKey> {
    let key = match name {
        "Total lipid (fat)" => NutrientKey::Fat,
        "Fatty acids, total saturated" => NutrientKey::SaturatedFat,
        "Fatty acids, total trans" => NutrientKey::TransFat,
        "Cholesterol" => NutrientKey::Cholesterol,
        "Sodium, Na" => NutrientKey::Sodium,
        "Carbohydrate, by difference" => NutrientKey::Carbohydrates,
        "Fiber, total dietary" => NutrientKey::Fiber,
        "Total Sugars" | "Sugars, total including NLEA" => NutrientKey::Sugars,
        "Protein" => NutrientKey::Protein,
        "Calcium, Ca" => NutrientKey::Calcium,
        "Iron, Fe" => NutrientKey::Iron,
        "Potassium, K" => NutrientKey::Potassium,
        "Magnesium, Mg" => NutrientKey::Magnesium,
        "Phosphorus, P" => NutrientKey::Phosphorus,
        "Zinc, Zn" => NutrientKey::Zinc,
        // energy is also reported in kJ
        "Energy" if !unit.is_some_and(|u| u.eq_ignore_ascii_case("kj")) => NutrientKey::Calories,
        "Vitamin C, total ascorbic acid" => NutrientKey::VitaminC,
        "Vitamin D (D2 + D3), International Units" => NutrientKey::VitaminD,
        _ => return None,
    };
    Some(key)
}

fn collect_nutrients<'a>(
    reported: impl Iterator<Item = (&'a str, Option<&'a str>, Option<f64>)>,
) -> NutrientValues {
    let mut values = NutrientValues::default();
    for (name, unit, amount) in reported {
        if let Some(key) = usda_key(name, unit) {
            values.set(key, amount.unwrap_or(0.0));
        }
    }
    values
}

/// `"<brand or category>: <description>"`, or the bare description.
fn display_name(brand: Option<&str>, category: Option<&str>, description: &str) -> String {
    match brand.or(category) {
        Some(prefix) => format!("{prefix}: {description}"),
        None => description.to_string(),
    }
}

impl From<SearchFood> for FoodItem {
    fn from(f: SearchFood) -> Self {
        let nutrients = collect_nutrients(f.food_nutrients.iter().filter_map(|n| {
            n.nutrient_name
                .as_deref()
                .map(|name| (name, n.unit_name.as_deref(), n.value))
        }));
        Self {
            fdc_id: f.fdc_id,
            name: display_name(f.brand_name.as_deref(), f.food_category.as_deref(), &f.description),
            nutrients,
        }
    }
}

impl From<DetailFood> for FoodItem {
    fn from(f: DetailFood) -> Self {
        let nutrients = collect_nutrients(f.food_nutrients.iter().filter_map(|n| {
            n.nutrient
                .as_ref()
                .map(|info| (info.name.as_str(), info.unit_name.as_deref(), n.amount))
        }));
        let category = match &f.food_category {
            Some(Category::Name(name)) => Some(name.as_str()),
            Some(Category::Described { description }) => Some(description.as_str()),
            None => f.branded_food_category.as_deref(),
        };
        Self {
            fdc_id: f.fdc_id,
            name: display_name(f.brand_name.as_deref(), category, &f.description),
            nutrients,
        }
    }
}

struct CacheEntry {
    foods: Vec<FoodItem>,
    expires_at: Instant,
}

/// FoodData Central client with a per-query search cache.
pub struct UsdaFoods {
    config: UsdaConfig,
    http: reqwest::Client,
    search_cache: RwLock<HashMap<String, CacheEntry>>,
}

impl UsdaFoods {
    pub fn new(config: UsdaConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            search_cache: RwLock::new(HashMap::new()),
        }
    }

    async fn cached(&self, key: &str) -> Option<Vec<FoodItem>> {
        let cache = self.search_cache.read().await;
        cache
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.foods.clone())
    }

    async fn remember(&self, key: String, foods: &[FoodItem]) {
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        let mut cache = self.search_cache.write().await;
        cache.retain(|_, entry| Instant::now() < entry.expires_at);
        cache.insert(
            key,
            CacheEntry {
                foods: foods.to_vec(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let response = self
            .http
            .get(url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl FoodLookup for UsdaFoods {
    #[instrument(skip(self))]
    async fn search_foods(&self, query: &str) -> Result<Vec<FoodItem>, LookupError> {
        let key = query.trim().to_lowercase();
        if let Some(hit) = self.cached(&key).await {
            debug!(query = %key, results = hit.len(), "food search cache hit");
            return Ok(hit);
        }

        let limit = self.config.search_limit.to_string();
        let url = format!("{}/foods/search", self.config.base_url);
        let response: SearchResponse = self
            .get_json(&url, &[("query", query), ("pageSize", limit.as_str())])
            .await?;
        let foods: Vec<FoodItem> = response
            .foods
            .into_iter()
            .take(self.config.search_limit as usize)
            .map(FoodItem::from)
            .collect();

        debug!(query = %key, results = foods.len(), "food search fetched");
        self.remember(key, &foods).await;
        Ok(foods)
    }

    #[instrument(skip(self))]
    async fn lookup_food_by_external_id(&self, fdc_id: i64) -> Result<FoodItem, LookupError> {
        let url = format!("{}/food/{}", self.config.base_url, fdc_id);
        match self.get_json::<DetailFood>(&url, &[]).await {
            Ok(detail) => Ok(detail.into()),
            Err(LookupError::Status { status: 404, .. }) => Err(LookupError::NotFound(fdc_id)),
            Err(e) => Err(e),
        }
    }
}
