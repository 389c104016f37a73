//! Administrator authentication for management endpoints.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::api::middleware::host_split::RequestScope;
use crate::utils::cookies::{AUTH_COOKIE, cookie_value};
use crate::{error::AppError, state::AppState};

/// Whether the request carries the administrator credential.
///
/// Only management-host requests can be authenticated. The credential is read
/// from the `auth` cookie first, then from an `Authorization: Bearer` header.
pub async fn is_authenticated(st: &AppState, parts: &mut Parts) -> bool {
    if parts.extensions.get::<RequestScope>() != Some(&RequestScope::Management) {
        return false;
    }

    if let Some(cookie) = cookie_value(&parts.headers, AUTH_COOKIE)
        && st.auth_service.authorize(&cookie)
    {
        return true;
    }

    match AuthBearer::from_request_parts(parts, &()).await {
        Ok(AuthBearer(token)) => st.auth_service.authorize(&token),
        Err(_) => false,
    }
}

/// Rejects unauthenticated requests to the management API.
///
/// # Credential Format
///
/// ```text
/// Cookie: auth=<hash>
/// Authorization: Bearer <hash>
/// ```
///
/// `<hash>` is the value set by `POST /_api/login` (see
/// [`crate::application::services::hash_password`]).
///
/// # Errors
///
/// Returns `401 Unauthorized` with `{"ok": false, "msg": "Not authorized"}` if
/// the request is not addressed to the management host, carries no
/// credential, or the credential does not match.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/stats", get(stats_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    if !is_authenticated(&st, &mut parts).await {
        return Err(AppError::unauthorized(
            "Not authorized",
            serde_json::json!({}),
        ));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}
