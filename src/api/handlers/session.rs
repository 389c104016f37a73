//! Handlers for administrator login and logout.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect},
};
use tracing::{info, warn};

use crate::api::dto::login::LoginRequest;
use crate::state::AppState;
use crate::utils::cookies::{clear_session_cookie, session_cookie};

/// Checks the administrator password and starts a cookie session.
///
/// # Endpoint
///
/// `POST /_api/login` with a form or JSON body `{"password": "..."}`
///
/// # Response
///
/// - Success: sets `auth=<hash>; HttpOnly` and redirects to `/dash`
/// - Failure: clears the cookie and redirects to `/`
///
/// Always fails when no administrator secret is configured.
pub async fn login_handler(
    State(state): State<AppState>,
    login: LoginRequest,
) -> impl IntoResponse {
    match state.auth_service.login(&login.password) {
        Some(credential) => {
            info!("Administrator logged in");
            (
                AppendHeaders([(SET_COOKIE, session_cookie(&credential))]),
                Redirect::to("/dash"),
            )
        }
        None => {
            warn!("Rejected login attempt");
            (
                AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
                Redirect::to("/"),
            )
        }
    }
}

/// Ends the cookie session.
///
/// # Endpoint
///
/// `GET|POST /_api/logout`
pub async fn logout_handler() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/"),
    )
}
