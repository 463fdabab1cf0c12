//! Consumption log. Every write validates its input before it can reach
//! the aggregator: percent in [0, 1000], no dates in the future.

mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::log_item_routes()
}
