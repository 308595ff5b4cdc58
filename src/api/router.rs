//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Layers (outermost → innermost): CORS → request tracing → body limit.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::ServerConfig;

/// JSON framing around the report text (keys, escapes, profile).
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the API router for `config`.
pub fn api_router(config: ServerConfig) -> Router {
    build_router(ApiContext::new(config))
}

fn build_router(ctx: ApiContext) -> Router {
    // Escaped JSON can run longer than the text it carries; the exact text
    // limit is enforced by the handler.
    let body_limit = ctx
        .config
        .max_text_bytes
        .saturating_mul(2)
        .saturating_add(BODY_OVERHEAD_BYTES);

    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/catalog", get(endpoints::catalog::list))
        .route("/reports/analyze", post(endpoints::reports::analyze))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
