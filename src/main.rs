mod app;
mod auth;
mod books;
mod config;
mod db;
mod error;
mod extract;
mod memory;
mod quotes;
mod state;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "bookquote=debug,axum=info,tower_http=info".to_string());
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

    // A missing signing key aborts startup.
    let config = AppConfig::from_env()?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        persistent = config.database_url.is_some(),
        hash_memory_kib = config.hash.memory_kib,
        hash_iterations = config.hash.iterations,
        "configuration loaded"
    );

    let state = AppState::init(config).await?;
    let config = state.config.clone();
    let app = app::build_app(state);
    app::serve(app, &config).await
}
