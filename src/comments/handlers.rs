use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CommentView, CreateCommentRequest},
    services,
};
use crate::{
    auth::CurrentUser,
    error::AppResult,
    grams::handlers::{redirect_to_grams, submitted_message},
    state::AppState,
};

pub fn write_routes() -> Router<AppState> {
    // `:id` matches the gram routes' parameter name.
    Router::new().route("/grams/:id/comments", post(create))
}

#[instrument(skip(state, caller, body))]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> AppResult<Response> {
    let message = submitted_message(body.map(|Json(b)| b.message));
    let comment = services::create_comment(&state, caller.as_ref(), &id, &message).await?;
    Ok(redirect_to_grams(CommentView::from(comment)))
}
