mod compose;
mod config;
mod errors;
mod fonts;
mod layout;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::fonts::FontSet;
use crate::layout::CommonMarkTokenizer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting imagegen v{}", env!("CARGO_PKG_VERSION"));

    // Font discovery happens once; the result is shared read-only by every request.
    let fonts_dir = config.fonts_dir.clone();
    let fonts = tokio::task::spawn_blocking(move || FontSet::discover(&fonts_dir)).await?;
    info!(
        family = fonts.family(),
        source = ?fonts.source(),
        bold_face = fonts.has_bold_face(),
        "Font set ready"
    );

    let state = AppState {
        config: config.clone(),
        fonts: Arc::new(fonts),
        tokenizer: Arc::new(CommonMarkTokenizer),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(
        "Image generator listening on {addr} (default background: {})",
        config.default_background().display()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
