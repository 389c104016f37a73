//! Splits traffic between the management host and redirect hosts.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{Uri, request::Parts},
};
use tracing::{debug, warn};

use crate::state::AppState;
use crate::utils::host::{extract_host, strip_port};

/// Path prefix every redirect-host request is rewritten under.
pub const REDIRECT_PREFIX: &str = "/_api/redirect";

/// Which surface a request was addressed to.
///
/// Set by [`layer`] as a request extension. Extracting it in a handler falls
/// back to [`RequestScope::Public`] when the extension is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    /// `Host` equals the configured management host.
    Management,
    /// Any other host; the request resolves a redirect.
    Public,
}

impl<S> FromRequestParts<S> for RequestScope
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestScope>()
            .copied()
            .unwrap_or(RequestScope::Public))
    }
}

/// Classifies the request by host and rewrites redirect-host paths.
///
/// A request for any host other than the management host has its path
/// prefixed with [`REDIRECT_PREFIX`] (query string preserved), so `/docs` on
/// `go.example.com` is routed as `/_api/redirect/docs`. Requests without a
/// usable host are treated as redirect-host requests.
///
/// # Example
///
/// ```rust,ignore
/// use axum::middleware;
/// use tower::Layer;
///
/// let app = middleware::map_request_with_state(state.clone(), host_split::layer).layer(inner);
/// ```
pub async fn layer(State(st): State<AppState>, mut req: Request) -> Request {
    let host = extract_host(req.headers())
        .ok()
        .or_else(|| req.uri().host().map(|h| strip_port(h).to_ascii_lowercase()));

    let scope = match host {
        Some(ref host) if host.as_str() == &*st.management_host => RequestScope::Management,
        _ => RequestScope::Public,
    };

    if scope == RequestScope::Public {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        match format!("{REDIRECT_PREFIX}{path_and_query}").parse::<Uri>() {
            Ok(rewritten) => {
                debug!(host = ?host, from = %req.uri(), to = %rewritten, "Rewriting redirect request");
                *req.uri_mut() = rewritten;
            }
            Err(e) => warn!(uri = %req.uri(), error = %e, "Could not rewrite request path"),
        }
    }

    req.extensions_mut().insert(scope);
    req
}
