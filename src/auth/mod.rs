use crate::state::AppState;
use axum::Router;

mod dto;
pub mod gate;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;

pub use gate::{require_user, CurrentUser};
pub use repo_types::User;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
