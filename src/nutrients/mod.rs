//! Nutrient adequacy engine.
//!
//! Biometrics produce a personalized range table, logged consumption is
//! averaged per day over a window, and each average is scored by its distance
//! from target. Everything except `store` and `handlers` is pure.

pub mod aggregate;
pub mod deviation;
pub mod error;
pub mod handlers;
pub mod key;
pub mod personalize;
pub mod reference;
pub mod report;
pub mod store;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::nutrient_routes()
}
