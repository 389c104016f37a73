//! Minimal `Cookie` / `Set-Cookie` handling for the `auth` session cookie.

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

/// Name of the cookie carrying the administrator credential.
pub const AUTH_COOKIE: &str = "auth";

/// Returns the value of the named cookie.
///
/// Handles multiple cookies in one or more `Cookie` headers by splitting on
/// semicolons and ignoring every other cookie.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|cookie_header| cookie_header.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name => Some(value.to_string()),
                _ => None,
            }
        })
}

/// `Set-Cookie` value storing the session credential.
pub fn session_cookie(credential: &str) -> HeaderValue {
    let cookie = format!("{AUTH_COOKIE}={credential}; HttpOnly; Path=/; SameSite=Lax");
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| clear_session_cookie())
}

/// `Set-Cookie` value expiring the session credential.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("auth=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}
