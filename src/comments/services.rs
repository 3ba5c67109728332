use tracing::info;

use super::repo_types::{Comment, NewComment};
use crate::{
    auth::{require_user, User},
    error::{AppError, AppResult},
    lookup::resolve_gram,
    state::AppState,
    validation::{require_present, ValidationErrors},
};

pub fn validate_comment(message: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_present(&mut errors, "message", message);
    errors.into_result()
}

/// Any signed-in caller may comment on any existing gram.
pub async fn create_comment(
    state: &AppState,
    caller: Option<&User>,
    raw_gram_id: &str,
    message: &str,
) -> AppResult<Comment> {
    let user = require_user(caller)?;
    let gram = resolve_gram(state, raw_gram_id).await?;
    validate_comment(message)?;

    let comment = state
        .comments
        .insert(NewComment {
            gram_id: gram.id,
            user_id: user.id,
            message: message.to_string(),
        })
        .await?
        // gram destroyed after the lookup
        .ok_or(AppError::NotFound("gram"))?;

    info!(comment_id = %comment.id, gram_id = %gram.id, user_id = %user.id, "comment created");
    Ok(comment)
}
