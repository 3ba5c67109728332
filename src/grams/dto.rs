use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::comments::dto::CommentView;

const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl Pagination {
    /// `(limit, offset)` clamped to what the list query accepts.
    pub fn bounds(&self) -> (i64, i64) {
        (self.limit.clamp(1, MAX_LIMIT), self.offset.max(0))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateGramRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GramView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub picture_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct GramDetails {
    #[serde(flatten)]
    pub gram: GramView,
    pub comments: Vec<CommentView>,
}

/// Form context for the new and edit gram forms.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GramForm {
    pub gram_id: Option<Uuid>,
    pub message: String,
    pub picture_required: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedGram {
    pub deleted: Uuid,
}
