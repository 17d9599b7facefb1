mod advising;
mod config;
mod errors;
mod routes;
mod state;
mod transcript;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advising::engine::PrerequisiteRecommender;
use crate::advising::prerequisites::PrerequisiteGraph;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::transcript::parser::CourseRecordParser;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting advisor API v{}", env!("CARGO_PKG_VERSION"));

    // Prerequisite table is loaded once and never changes afterwards
    let graph = Arc::new(
        PrerequisiteGraph::load(config.prerequisites_path.as_deref())
            .context("Failed to load prerequisite table")?,
    );

    let parser = Arc::new(CourseRecordParser::new()?);

    let recommender = Arc::new(PrerequisiteRecommender::new(
        graph.clone(),
        config.display_limit,
    ));
    info!(
        "Recommendation display limit: {}, upload limit: {} bytes",
        config.display_limit, config.max_upload_bytes
    );

    let state = AppState {
        config: config.clone(),
        graph,
        parser,
        recommender,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
