use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::dto::{ProfileRequest, ProfileResponse};
use super::repo_types::Profile;
use crate::{auth::AuthUser, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(get_profile).post(create_profile).put(update_profile),
    )
}

/// Loads the caller's profile, 404 if they have not created one yet.
pub async fn require_profile(
    state: &AppState,
    user_id: uuid::Uuid,
) -> Result<Profile, (StatusCode, String)> {
    match Profile::find_by_user(&state.db, user_id).await {
        Ok(Some(p)) => Ok(p),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Profile not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, "profile lookup failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let profile = require_profile(&state, user_id).await?;
    let today = OffsetDateTime::now_utc().date();
    Ok(Json(ProfileResponse::new(&profile, today)))
}

#[instrument(skip(state, payload))]
pub async fn create_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();
    let input = payload.validate(today).map_err(|e| {
        warn!(error = %e, %user_id, "invalid profile");
        e
    })?;

    let profile = match Profile::create(&state.db, user_id, &input).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            warn!(%user_id, "profile already exists");
            return Err((StatusCode::CONFLICT, "Profile already exists".into()));
        }
        Err(e) => {
            error!(error = %e, %user_id, "create profile failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(%user_id, profile_id = %profile.id, "profile created");
    Ok((StatusCode::CREATED, Json(ProfileResponse::new(&profile, today))))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let today = OffsetDateTime::now_utc().date();
    let input = payload.validate(today).map_err(|e| {
        warn!(error = %e, %user_id, "invalid profile");
        e
    })?;

    let profile = match Profile::update(&state.db, user_id, &input).await {
        Ok(Some(p)) => p,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Profile not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, "update profile failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(%user_id, profile_id = %profile.id, "profile updated");
    Ok(Json(ProfileResponse::new(&profile, today)))
}
