mod canvas;
mod config;
mod errors;
mod layout;
mod report;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::report::images::{decode_image, ResolvedImage};
use crate::report::{DocumentAssembler, HttpImageFetcher, ImagePlacer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Immoby report service v{}", env!("CARGO_PKG_VERSION"));

    // A missing or broken logo falls back to the text title
    let logo = match &config.logo_path {
        Some(path) => load_logo(path).await,
        None => None,
    };

    let placer = ImagePlacer::new(Arc::new(HttpImageFetcher::new()));
    info!(
        "Report config: {} competitors max, image timeout {:?}",
        config.report.max_competitors, config.report.image_timeout
    );

    let assembler = DocumentAssembler::new(config.report.clone(), placer, logo);

    // Build app state
    let state = AppState {
        assembler: Arc::new(assembler),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn load_logo(path: &Path) -> Option<ResolvedImage> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Logo {} could not be read: {e}", path.display());
            return None;
        }
    };
    match decode_image(&bytes) {
        Ok(logo) => {
            info!("Logo loaded: {}x{} px", logo.width, logo.height);
            Some(logo)
        }
        Err(e) => {
            warn!("Logo {} could not be decoded: {e}", path.display());
            None
        }
    }
}
