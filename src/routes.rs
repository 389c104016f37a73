//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! Redirect hosts (any `Host` other than `MANAGEMENT_HOST`):
//!
//! - `GET  /{*slug}`            - Rewritten to `/_api/redirect/{*slug}`
//!
//! Management host:
//!
//! - `GET  /health`             - Health check (public)
//! - `GET  /_api/redirect/...`  - Resolve without counting a hit (public)
//! - `POST /_api/login`, `/_api/logout` - Cookie session (public)
//! - `/_api/redirects`, `/_api/stats`   - Management API (session required)
//! - `/`, `/dash/*`, everything else    - Static dashboard assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging, outermost
//! - **Host split** - Management/redirect classification and path rewrite
//! - **Rate limiting** - Per-IP token bucket on login and the management API
//! - **Authentication** - Cookie or Bearer credential (API) and page guard (web)

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::RateLimit;
use crate::api::middleware::{host_split, tracing};
use crate::state::AppState;
use crate::web;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - how clients are keyed for rate limiting; see [`RateLimit`]
/// - `static_dir` - directory served on the management host
pub fn app_router(state: AppState, rate_limit: RateLimit, static_dir: &str) -> Router {
    let inner = Router::new()
        .route("/health", get(health_handler))
        .nest("/_api", api::routes::api_routes(state.clone(), rate_limit))
        .merge(web::routes::page_routes(state.clone(), static_dir))
        .with_state(state.clone());

    let split = middleware::map_request_with_state(state, host_split::layer).layer(inner);

    Router::new()
        .fallback_service(split)
        .layer(tracing::layer())
}
