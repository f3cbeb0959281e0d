use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use optimizer_api::config::Config;
use optimizer_api::documents::PdftoppmRasterizer;
use optimizer_api::llm_client::GeminiClient;
use optimizer_api::routes::build_router;
use optimizer_api::session::SessionStore;
use optimizer_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing GOOGLE_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("optimizer_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Optimizer v{}", env!("CARGO_PKG_VERSION"));

    let llm = GeminiClient::new(
        config.google_api_key.clone(),
        &config.gemini_api_base,
        &config.gemini_model,
    )?;
    info!("LLM client initialized (model: {})", config.gemini_model);

    let rasterizer = PdftoppmRasterizer::new(config.pdftoppm_path.clone(), config.render_dpi);
    info!(
        "PDF rasterizer: {} at {} dpi",
        config.pdftoppm_path, config.render_dpi
    );

    let state = AppState {
        sessions: SessionStore::new(config.session_ttl_secs),
        llm: Arc::new(llm),
        rasterizer: Arc::new(rasterizer),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
