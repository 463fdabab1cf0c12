use serde::{Deserialize, Serialize};

use super::lookup::FoodItem;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
}

/// One page of search results.
#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub query: String,
    pub page: u32,
    pub num_pages: u32,
    pub total: usize,
    pub items: Vec<FoodItem>,
}
