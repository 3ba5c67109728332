use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Comment;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub gram_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Comment> for CommentView {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            gram_id: c.gram_id,
            user_id: c.user_id,
            message: c.message,
            created_at: c.created_at,
        }
    }
}
