pub mod dto;
pub mod handlers;
pub mod policy;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod validation;

use crate::state::AppState;
use axum::Router;

/// Where successful gram and comment mutations redirect.
pub const GRAMS_PATH: &str = "/api/v1/grams";

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes(max_upload_bytes))
}
