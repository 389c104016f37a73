//! Handler for slug redirects.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::api::middleware::host_split::RequestScope;
use crate::domain::entities::parse_absolute_url;
use crate::error::AppError;
use crate::state::AppState;

/// Slug resolved for requests to the bare root of a redirect host.
pub const DEFAULT_SLUG: &str = "_default";

/// Body sent along with a 301/302.
#[derive(Template, WebTemplate)]
#[template(path = "redirect.html")]
struct RedirectTemplate {
    location: String,
}

/// Page for slugs with no matching redirect.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {}

/// Resolves the `_default` slug.
///
/// # Endpoint
///
/// `GET /_api/redirect` and `GET /_api/redirect/`
pub async fn redirect_default_handler(
    State(state): State<AppState>,
    scope: RequestScope,
) -> Result<Response, AppError> {
    respond(&state, scope, DEFAULT_SLUG).await
}

/// Redirects a slug to its destination.
///
/// # Endpoint
///
/// `GET /_api/redirect/{*slug}`
///
/// Redirect hosts reach this handler through the host split, so `/docs` on a
/// redirect host resolves the slug `docs`.
///
/// # Request Flow
///
/// 1. Probe with `exists` (exact key or any pattern match)
/// 2. Resolve with the store: exact key first, then the first matching pattern
///    in insertion order, with capture groups substituted into the URL
/// 3. Count a hit against the matched key (redirect hosts only)
/// 4. Return 301 for permanent records, 302 otherwise
///
/// A failed hit is logged and does not prevent the redirect.
///
/// # Errors
///
/// Returns a 404 page if nothing matches.
/// Returns 400 Bad Request if a pattern rewrite does not produce an absolute URL.
pub async fn redirect_handler(
    State(state): State<AppState>,
    scope: RequestScope,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    respond(&state, scope, &slug).await
}

async fn respond(state: &AppState, scope: RequestScope, slug: &str) -> Result<Response, AppError> {
    if !state.store.exists(slug).await? {
        debug!(slug, "No redirect for slug");
        return Ok(not_found());
    }

    let Some(resolution) = state.store.resolve(slug).await? else {
        return Ok(not_found());
    };

    if scope == RequestScope::Public
        && let Err(e) = state.store.hit(&resolution.key).await
    {
        warn!(key = %resolution.key, error = %e, "Failed to record hit");
    }

    let status = if resolution.permanent {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::FOUND
    };

    let location = location_header(&resolution.location)?;

    Ok((
        status,
        [(header::LOCATION, location)],
        RedirectTemplate {
            location: resolution.location,
        },
    )
        .into_response())
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate {}).into_response()
}

/// Uses the destination verbatim when it is a valid header value, otherwise
/// its percent-encoded serialization.
fn location_header(location: &str) -> Result<HeaderValue, AppError> {
    if let Ok(value) = HeaderValue::from_str(location) {
        return Ok(value);
    }

    let url = parse_absolute_url(location)?;
    HeaderValue::from_str(url.as_str()).map_err(|_| {
        AppError::bad_request(
            "Redirect URL must be a valid URL.",
            serde_json::json!({ "url": location }),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_header_verbatim() {
        let value = location_header("https://example.com/a?b=c").unwrap();
        assert_eq!(value, "https://example.com/a?b=c");
    }

    #[test]
    fn test_location_header_encodes_non_ascii() {
        let value = location_header("https://example.com/caf\u{e9}").unwrap();
        assert_eq!(value, "https://example.com/caf%C3%A9");
    }

    #[test]
    fn test_location_header_rejects_garbage() {
        assert!(location_header("not a url \u{e9}").is_err());
    }
}
