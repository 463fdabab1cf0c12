mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use handlers::require_profile;

pub fn router() -> Router<AppState> {
    handlers::profile_routes()
}
