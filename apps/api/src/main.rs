mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod submissions;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::generation::rewriter::GeminiRewriter;
use crate::llm_client::LlmClient;
use crate::render::DocumentAssembler;
use crate::routes::build_router;
use crate::state::AppState;
use crate::submissions::{report_outcomes, PgSubmissionSink, SubmissionLog};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Opportunity CV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_base.clone(), config.gemini_model.clone());
    info!(
        "LLM client initialized (model: {}, community key: {})",
        llm.model(),
        if config.gemini_api_key.is_some() { "set" } else { "not set" }
    );
    let rewriter = Arc::new(GeminiRewriter::new(llm));

    // Submission logging is optional
    let submissions = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url)?;
            let (log, outcomes) = SubmissionLog::new(Arc::new(PgSubmissionSink::new(pool)));
            tokio::spawn(report_outcomes(outcomes));
            Some(log)
        }
        None => {
            info!("DATABASE_URL not set; submission logging disabled");
            None
        }
    };

    let assembler = Arc::new(DocumentAssembler::new(config.scratch_dir()));
    info!("QR scratch directory: {}", assembler.scratch_dir().display());

    let state = AppState {
        rewriter,
        submissions,
        assembler,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
