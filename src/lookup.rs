use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    grams::repo_types::Gram,
    state::AppState,
};

/// Parses a path identifier. One that cannot name a row is reported the same
/// way as a missing row.
pub fn parse_id(raw: &str, kind: &'static str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        debug!(id = %raw, kind, "malformed id");
        AppError::NotFound(kind)
    })
}

pub async fn resolve_gram(state: &AppState, raw_id: &str) -> AppResult<Gram> {
    let id = parse_id(raw_id, "gram")?;
    state
        .grams
        .find(id)
        .await?
        .ok_or(AppError::NotFound("gram"))
}
