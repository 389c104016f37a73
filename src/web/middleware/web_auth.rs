//! Cookie-based page guard for the management host.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::middleware::auth::is_authenticated;
use crate::state::AppState;

/// Path of the dashboard.
pub const DASHBOARD_PATH: &str = "/dash";

fn is_dashboard(path: &str) -> bool {
    path == DASHBOARD_PATH
        || path
            .strip_prefix(DASHBOARD_PATH)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Sends browsers to the right page for their session state.
///
/// # Redirects
///
/// - `/` with a valid session goes to `/dash`
/// - `/dash` and anything below it without a valid session goes to `/`
///
/// Every other path passes through untouched. The session is checked the same
/// way as [`crate::api::middleware::auth`], but failures redirect instead of
/// returning `401`.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use crate::web::middleware::web_auth;
///
/// let pages = Router::new()
///     .fallback_service(ServeDir::new("public"))
///     .layer(middleware::from_fn_with_state(state.clone(), web_auth::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path();
    let guarded_root = path == "/";
    let guarded_dashboard = is_dashboard(path);

    if !guarded_root && !guarded_dashboard {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();
    let authenticated = is_authenticated(&st, &mut parts).await;

    if guarded_root && authenticated {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    if guarded_dashboard && !authenticated {
        return Redirect::to("/").into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}
