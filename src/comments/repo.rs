use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Comment, NewComment};

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// `Ok(None)` when the parent gram does not exist.
    async fn insert(&self, comment: NewComment) -> anyhow::Result<Option<Comment>>;
    /// Oldest first.
    async fn list_by_gram(&self, gram_id: Uuid) -> anyhow::Result<Vec<Comment>>;
}

// `seq` breaks ties between comments inserted in the same instant.
const LIST_BY_GRAM: &str = r#"
    SELECT id, gram_id, user_id, message, created_at
      FROM comments
     WHERE gram_id = $1
     ORDER BY created_at ASC, seq ASC
"#;

pub struct PgCommentRepository {
    db: PgPool,
}

impl PgCommentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn insert(&self, comment: NewComment) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (gram_id, user_id, message)
            SELECT g.id, $2, $3
              FROM grams g
             WHERE g.id = $1
            RETURNING id, gram_id, user_id, message, created_at
            "#,
        )
        .bind(comment.gram_id)
        .bind(comment.user_id)
        .bind(&comment.message)
        .fetch_optional(&self.db)
        .await
        .context("insert comment")?;
        Ok(row)
    }

    async fn list_by_gram(&self, gram_id: Uuid) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, Comment>(LIST_BY_GRAM)
            .bind(gram_id)
            .fetch_all(&self.db)
            .await
            .context("list comments by gram")?;
        Ok(rows)
    }
}
