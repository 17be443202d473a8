//! nlsql HTTP server
//!
//! Accepts natural-language questions over HTTP, translates them to SQL via
//! the `nlsql-core` pipeline, and returns rows plus a Markdown summary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use nlsql_core::{ModelClient, QueryPipeline};

mod config;
mod logging;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (credential lives in .env or the env)
    dotenvy::dotenv().ok();

    let config_path =
        std::env::var("NLSQL_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        config::Config::load(&config_path)
            .with_context(|| format!("failed to load {config_path}"))?
    } else {
        config::Config::from_env()
    };

    logging::init(&config.logging);

    // Credential resolution fails here, at startup, not on the first request.
    let model = ModelClient::from_env()?
        .with_timeout(Duration::from_secs(config.model.timeout_secs));
    info!(model = %model.model(), "model client ready");

    let pipeline = QueryPipeline::new(model).with_display_rows(config.model.display_rows);
    let state = Arc::new(routes::AppState { pipeline });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "nlsql server listening");

    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
