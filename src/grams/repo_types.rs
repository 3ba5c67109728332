use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Gram row. `user_id` is the owner and never changes after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Gram {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub picture_key: Option<String>, // storage object key
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Already-validated values for a new gram row.
#[derive(Debug, Clone)]
pub struct NewGram {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub picture_key: Option<String>,
}
