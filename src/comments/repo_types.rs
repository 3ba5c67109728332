use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub gram_id: Uuid,
    pub user_id: Uuid, // author
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub gram_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
}
