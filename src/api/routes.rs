//! API route configuration, mounted under `/_api`.

use crate::api::handlers::{
    create_redirect_handler, delete_redirect_handler, list_redirects_handler, login_handler,
    logout_handler, redirect_default_handler, redirect_handler, stats_handler,
    update_redirect_handler,
};
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Redirect resolution, reached on redirect hosts through the host split.
///
/// # Endpoints
///
/// - `GET /redirect`          - Resolve `_default`
/// - `GET /redirect/`         - Resolve `_default`
/// - `GET /redirect/{*slug}`  - Resolve `slug`
pub fn redirect_routes() -> Router<AppState> {
    Router::new()
        .route("/redirect", get(redirect_default_handler))
        .route("/redirect/", get(redirect_default_handler))
        .route("/redirect/{*slug}", get(redirect_handler))
}

/// Cookie session endpoints. Login is rate limited per client.
///
/// # Endpoints
///
/// - `POST     /login`  - Start a session
/// - `GET|POST /logout` - End the session
pub fn session_routes(limit: RateLimit) -> Router<AppState> {
    let login = rate_limit::apply(
        Router::new().route("/login", post(login_handler)),
        limit,
        rate_limit::LOGIN,
    );

    login.route("/logout", get(logout_handler).post(logout_handler))
}

/// Management routes, protected by [`crate::api::middleware::auth`].
///
/// # Endpoints
///
/// - `GET    /redirects` - List redirects
/// - `POST   /redirects` - Create a redirect
/// - `PATCH  /redirects` - Partially update a redirect
/// - `DELETE /redirects` - Delete a redirect and its counter
/// - `GET    /stats`     - Hit counters
pub fn protected_routes(state: AppState, limit: RateLimit) -> Router<AppState> {
    let router = Router::new()
        .route(
            "/redirects",
            get(list_redirects_handler)
                .post(create_redirect_handler)
                .patch(update_redirect_handler)
                .delete(delete_redirect_handler),
        )
        .route("/stats", get(stats_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer));

    rate_limit::apply(router, limit, rate_limit::ADMIN)
}

/// Every `/_api` route.
pub fn api_routes(state: AppState, limit: RateLimit) -> Router<AppState> {
    Router::new()
        .merge(redirect_routes())
        .merge(session_routes(limit))
        .merge(protected_routes(state, limit))
}
