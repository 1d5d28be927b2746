use std::sync::Arc;

use anyhow::Context;

mod app;
mod auth;
mod config;
mod dashboard;
mod dates;
mod db;
mod error;
mod insights;
#[cfg(test)]
mod memory;
mod moods;
mod resources;
mod state;
mod storage;
mod tasks;
mod uploads;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "studybuddy=debug,axum=info,tower_http=info".to_string());
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

    let config = Arc::new(AppConfig::from_env()?);
    let db = db::connect(&config).await?;
    db::migrate(&db).await;

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .context("create uploads dir")?;
    let state = AppState::from_pool(db, config);

    app::serve(app::build_app(state)).await
}
