//! HTTP surface: routes, middleware and static assets.

mod cors;
mod docs;
pub mod routes;
pub mod templates;

use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use cors::cors_layer;

/// Assemble the application router
///
/// `api_v1` is mounted under the configured `API_V1_STR` prefix.
pub fn create_router(state: AppState, api_v1: Router<AppState>) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(routes::landing_page))
        .route("/api", get(routes::api_root))
        .route("/health", get(routes::health_check))
        .route("/docs", get(docs::swagger_ui))
        .route("/redoc", get(docs::redoc))
        .nest(&config.api_v1_str, api_v1)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(cors_layer(&config.backend_cors_origins))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
