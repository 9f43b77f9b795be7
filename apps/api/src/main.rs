mod config;
mod db;
mod errors;
mod intake;
mod models;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::intake::analysis::AnalysisJobs;
use crate::intake::scorer::RuleBasedScorer;
use crate::routes::build_router;
use crate::scoring::{ScoringEngine, SkillCatalog};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Intake API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Skill catalog and rule table are fixed for the life of the process
    let catalog = config
        .skill_catalog
        .clone()
        .map(SkillCatalog::new)
        .unwrap_or_default();
    let engine = Arc::new(ScoringEngine::new(catalog));
    info!(
        "Scoring engine ready: {} skills, {} rules",
        engine.catalog().len(),
        engine.rules().len()
    );
    debug!("Skill catalog: {:?}", engine.catalog().skills());
    if engine.catalog().is_empty() {
        warn!("Skill catalog is empty; the skill-count rule can never fire");
    }
    let scorer = Arc::new(RuleBasedScorer::new(engine));

    info!(
        "Analysis delay {}ms, auto-analyze {}",
        config.analysis_delay_ms, config.auto_analyze
    );

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        scorer,
        jobs: AnalysisJobs::new(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the intake frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
