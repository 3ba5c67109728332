use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Gram, NewGram};

#[async_trait]
pub trait GramRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Gram>>;
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Gram>>;
    async fn insert(&self, gram: NewGram) -> anyhow::Result<Gram>;
    /// `Ok(None)` when the row no longer exists.
    async fn update_message(&self, id: Uuid, message: &str) -> anyhow::Result<Option<Gram>>;
    /// Removes the gram and its comments; `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgGramRepository {
    db: PgPool,
}

impl PgGramRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GramRepository for PgGramRepository {
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Gram>> {
        let rows = sqlx::query_as::<_, Gram>(
            r#"
            SELECT id, user_id, message, picture_key, created_at, updated_at
            FROM grams
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .context("list grams")?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Gram>> {
        let row = sqlx::query_as::<_, Gram>(
            r#"
            SELECT id, user_id, message, picture_key, created_at, updated_at
            FROM grams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find gram")?;
        Ok(row)
    }

    async fn insert(&self, gram: NewGram) -> anyhow::Result<Gram> {
        let row = sqlx::query_as::<_, Gram>(
            r#"
            INSERT INTO grams (id, user_id, message, picture_key)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, message, picture_key, created_at, updated_at
            "#,
        )
        .bind(gram.id)
        .bind(gram.user_id)
        .bind(&gram.message)
        .bind(&gram.picture_key) // Option<String> → NULL allowed
        .fetch_one(&self.db)
        .await
        .context("insert gram")?;
        Ok(row)
    }

    async fn update_message(&self, id: Uuid, message: &str) -> anyhow::Result<Option<Gram>> {
        let row = sqlx::query_as::<_, Gram>(
            r#"
            UPDATE grams
               SET message = $2, updated_at = now()
             WHERE id = $1
            RETURNING id, user_id, message, picture_key, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(message)
        .fetch_optional(&self.db)
        .await
        .context("update gram message")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM grams WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete gram")?;
        Ok(res.rows_affected() > 0)
    }
}
