use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgUserRepository, UserRepository};
use crate::comments::repo::{CommentRepository, PgCommentRepository};
use crate::config::AppConfig;
use crate::grams::repo::{GramRepository, PgGramRepository};
use crate::storage::{Storage, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub grams: Arc<dyn GramRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init(config: AppConfig, db: PgPool) -> anyhow::Result<Self> {
        // S3 / MinIO
        let storage = Arc::new(Storage::new(&config.storage).await?) as Arc<dyn StorageClient>;
        Ok(Self::from_parts(db, Arc::new(config), storage))
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>, storage: Arc<dyn StorageClient>) -> Self {
        Self {
            config,
            users: Arc::new(PgUserRepository::new(db.clone())),
            grams: Arc::new(PgGramRepository::new(db.clone())),
            comments: Arc::new(PgCommentRepository::new(db)),
            storage,
        }
    }

    /// In-memory repositories and a recording storage client.
    #[cfg(test)]
    pub fn fake() -> Self {
        crate::test_support::fake_parts().0
    }
}
