use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, patch},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{CreateLogItemRequest, ListQuery, UpdateDateRequest, UpdatePercentRequest};
use super::repo;
use super::repo_types::LogItemRow;
use crate::{auth::AuthUser, foods, profiles::require_profile, state::AppState, validation};

/// Listing looks this far back and ahead when no bounds are given.
const LIST_SPAN_DAYS: i64 = 730;

pub fn log_item_routes() -> Router<AppState> {
    Router::new()
        .route("/log-items", get(list_log_items).post(create_log_item))
        .route("/log-items/:id", delete(delete_log_item))
        .route("/log-items/:id/percent", patch(update_percent))
        .route("/log-items/:id/date", patch(update_date))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Log item not found".into())
}

/// POST /log-items { fdc_id, consumed_at, percent_consumed }
#[instrument(skip(state, body))]
pub async fn create_log_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateLogItemRequest>,
) -> Result<(StatusCode, HeaderMap, Json<LogItemRow>), (StatusCode, String)> {
    let checked = validation::percent_consumed(body.percent_consumed).and_then(|p| {
        validation::consumed_at(body.consumed_at, OffsetDateTime::now_utc()).map(|at| (p, at))
    });
    let (percent, consumed_at) = checked.map_err(|e| {
        warn!(error = %e, %user_id, "invalid log item");
        e
    })?;

    let profile = require_profile(&state, user_id).await?;
    let (food_item_id, food) = match foods::services::resolve(&state, body.fdc_id).await {
        Ok(Some(found)) => found,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Food not found".into())),
        Err(e) => {
            error!(error = %e, fdc_id = body.fdc_id, "resolve food failed");
            return Err(internal(e));
        }
    };

    let id = repo::insert(&state.db, profile.id, food_item_id, consumed_at, percent)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "insert log item failed");
            internal(e)
        })?;
    info!(%user_id, log_item_id = %id, fdc_id = food.fdc_id, percent, "food logged");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/log-items/{}", id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((
        StatusCode::CREATED,
        headers,
        Json(LogItemRow {
            id,
            fdc_id: food.fdc_id,
            food_name: food.name,
            consumed_at,
            percent_consumed: percent,
        }),
    ))
}

/// GET /log-items?start=..&end=.. newest first
#[instrument(skip(state))]
pub async fn list_log_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<LogItemRow>>, (StatusCode, String)> {
    let now = OffsetDateTime::now_utc();
    let start = q.start.unwrap_or(now - Duration::days(LIST_SPAN_DAYS));
    let end = q.end.unwrap_or(now + Duration::days(LIST_SPAN_DAYS));

    let profile = require_profile(&state, user_id).await?;
    let rows = repo::list_in_window(&state.db, profile.id, start, end)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "list log items failed");
            internal(e)
        })?;
    Ok(Json(rows))
}

#[instrument(skip(state, body))]
pub async fn update_percent(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePercentRequest>,
) -> Result<Json<LogItemRow>, (StatusCode, String)> {
    let percent = validation::percent_consumed(body.percent_consumed).map_err(|e| {
        warn!(error = %e, %user_id, %id, "invalid percent");
        e
    })?;

    let profile = require_profile(&state, user_id).await?;
    let updated = repo::update_percent(&state.db, profile.id, id, percent)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(not_found());
    }
    info!(%user_id, %id, percent, "log item percent updated");
    reload(&state, profile.id, id).await
}

#[instrument(skip(state, body))]
pub async fn update_date(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateDateRequest>,
) -> Result<Json<LogItemRow>, (StatusCode, String)> {
    let consumed_at = validation::consumed_at(body.consumed_at, OffsetDateTime::now_utc())
        .map_err(|e| {
            warn!(error = %e, %user_id, %id, "invalid log date");
            e
        })?;

    let profile = require_profile(&state, user_id).await?;
    let updated = repo::update_consumed_at(&state.db, profile.id, id, consumed_at)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(not_found());
    }
    info!(%user_id, %id, "log item date updated");
    reload(&state, profile.id, id).await
}

#[instrument(skip(state))]
pub async fn delete_log_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let profile = require_profile(&state, user_id).await?;
    let deleted = repo::delete(&state.db, profile.id, id)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, %id, "delete log item failed");
            internal(e)
        })?;
    if !deleted {
        return Err(not_found());
    }
    info!(%user_id, %id, "log item deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn reload(
    state: &AppState,
    profile_id: Uuid,
    id: Uuid,
) -> Result<Json<LogItemRow>, (StatusCode, String)> {
    match repo::find(&state.db, profile_id, id).await {
        Ok(Some(row)) => Ok(Json(row)),
        Ok(None) => Err(not_found()),
        Err(e) => {
            error!(error = %e, %id, "reload log item failed");
            Err(internal(e))
        }
    }
}
