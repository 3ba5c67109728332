mod app;
mod auth;
mod comments;
mod config;
mod db;
mod error;
mod grams;
mod lookup;
mod state;
mod storage;
#[cfg(test)]
mod test_support;
mod validation;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "grammable=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let db = db::connect(&config).await?;
    db::migrate(&db).await?;
    tracing::info!(require_picture = config.grams.require_picture, "database ready");

    let state = AppState::init(config, db).await?;
    app::serve(app::build_app(state)).await
}
