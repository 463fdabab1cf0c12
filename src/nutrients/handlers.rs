use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{error, instrument, warn};

use super::aggregate::Window;
use super::error::ReportError;
use super::key::NutrientKey;
use super::personalize::personalize;
use super::report::NutrientReport;
use super::store::compute_nutrient_report;
use crate::{auth::AuthUser, profiles::require_profile, state::AppState};

const DEFAULT_WINDOW_DAYS: i64 = 7;

pub fn nutrient_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrients/report", get(get_report))
        .route("/nutrients/targets", get(get_targets))
        .route("/dashboard", get(get_dashboard))
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

impl WindowQuery {
    /// Missing bounds default to the last seven days before `now`.
    pub fn resolve(&self, now: OffsetDateTime) -> Result<(OffsetDateTime, OffsetDateTime), ReportError> {
        let end = self.end.unwrap_or(now);
        let start = self
            .start
            .unwrap_or(end - Duration::days(DEFAULT_WINDOW_DAYS));
        if end < start {
            return Err(ReportError::InvalidWindow { start, end });
        }
        Ok((start, end))
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    pub nutrients: NutrientReport,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub last_day: ReportResponse,
    pub last_week: ReportResponse,
}

#[derive(Debug, Serialize)]
pub struct TargetRow {
    pub nutrient: NutrientKey,
    pub min: f64,
    pub max: f64,
    pub target: f64,
}

async fn report_for(
    state: &AppState,
    profile_id: uuid::Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<ReportResponse, (StatusCode, String)> {
    let nutrients = compute_nutrient_report(state.nutrition.as_ref(), profile_id, start, end)
        .await
        .map_err(|e| {
            if let ReportError::Store(_) = e {
                error!(error = %e, %profile_id, "nutrient report failed");
            }
            e
        })?;
    Ok(ReportResponse {
        start,
        end,
        nutrients,
    })
}

/// GET /nutrients/report?start=..&end=.. (RFC 3339, both inclusive)
#[instrument(skip(state))]
pub async fn get_report(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(window): Query<WindowQuery>,
) -> Result<Json<ReportResponse>, (StatusCode, String)> {
    let (start, end) = window.resolve(OffsetDateTime::now_utc()).map_err(|e| {
        warn!(error = %e, %user_id, "rejected report window");
        e
    })?;
    let profile = require_profile(&state, user_id).await?;
    Ok(Json(report_for(&state, profile.id, start, end).await?))
}

/// GET /dashboard: the last 24 hours and the last 7 days, worst nutrients first.
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let profile = require_profile(&state, user_id).await?;
    let now = OffsetDateTime::now_utc();
    let day = Window::trailing_days(now, 1);
    let week = Window::trailing_days(now, DEFAULT_WINDOW_DAYS);
    let last_day = report_for(&state, profile.id, day.start, day.end).await?;
    let last_week = report_for(&state, profile.id, week.start, week.end).await?;
    Ok(Json(DashboardResponse {
        last_day,
        last_week,
    }))
}

/// GET /nutrients/targets: the caller's personalized daily ranges.
#[instrument(skip(state))]
pub async fn get_targets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<TargetRow>>, (StatusCode, String)> {
    let profile = require_profile(&state, user_id).await?;
    let ranges = personalize(&profile.biometrics(OffsetDateTime::now_utc().date()));
    let rows = ranges
        .iter()
        .map(|(nutrient, r)| TargetRow {
            nutrient,
            min: r.min,
            max: r.max,
            target: r.target,
        })
        .collect();
    Ok(Json(rows))
}

#[cfg(test)]
mod handlers_tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn window_defaults_to_last_week() {
        let now = datetime!(2024-05-10 12:00 UTC);
        let q = WindowQuery {
            start: None,
            end: None,
        };
        assert_eq!(q.resolve(now).unwrap(), (datetime!(2024-05-03 12:00 UTC), now));
    }

    #[test]
    fn backwards_window_is_rejected() {
        let q = WindowQuery {
            start: Some(datetime!(2024-05-10 0:00 UTC)),
            end: Some(datetime!(2024-05-09 0:00 UTC)),
        };
        let err = q.resolve(datetime!(2024-05-11 0:00 UTC)).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_window_is_allowed() {
        let at = datetime!(2024-05-10 0:00 UTC);
        let q = WindowQuery {
            start: Some(at),
            end: Some(at),
        };
        assert_eq!(q.resolve(at).unwrap(), (at, at));
    }

    #[test]
    fn query_string_parses_rfc3339() {
        let q: WindowQuery =
            serde_json::from_str(r#"{"start":"2024-05-01T00:00:00Z","end":"2024-05-02T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(q.start, Some(datetime!(2024-05-01 0:00 UTC)));
        assert_eq!(q.end, Some(datetime!(2024-05-02 0:00 UTC)));
    }
}
