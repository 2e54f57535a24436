pub mod generate;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate-image", post(generate::handle_generate_image))
        .route(
            "/generate-image/:image_name",
            post(generate::handle_generate_named_image),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
