use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use super::dto::{SearchPage, SearchQuery};
use super::lookup::FoodItem;
use super::services;
use crate::state::AppState;

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/search", get(search_foods))
        .route("/foods/:fdc_id", get(get_food))
}

/// GET /foods/search?q=apple&page=2
#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchPage>, (StatusCode, String)> {
    let page = services::search(&state, &params.q, params.page)
        .await
        .map_err(|e| {
            error!(error = %e, query = %params.q, "search_foods failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(page))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    Path(fdc_id): Path<i64>,
) -> Result<Json<FoodItem>, (StatusCode, String)> {
    match services::resolve(&state, fdc_id).await {
        Ok(Some((_, food))) => Ok(Json(food)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Food not found".into())),
        Err(e) => {
            error!(error = %e, fdc_id, "get_food failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
