//! Management host page routing.

use crate::state::AppState;
use crate::web::middleware::web_auth;
use axum::{
    Router,
    extract::Request,
    http::Uri,
    middleware,
};
use tower::Layer;
use tower_http::services::ServeDir;

/// Static pages served on the management host.
///
/// Files come from `static_dir`; directories serve their `index.html`, and a
/// path with no matching file is retried as `<path>.html`, so `/about` serves
/// `about.html`. `/` and `/dash` are guarded by [`web_auth`], which redirects
/// between the two based on the session cookie.
pub fn page_routes(state: AppState, static_dir: &str) -> Router<AppState> {
    let html_pages = middleware::map_request(with_html_extension).layer(ServeDir::new(static_dir));
    let files = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .fallback(html_pages);

    Router::new()
        .fallback_service(files)
        .layer(middleware::from_fn_with_state(state, web_auth::layer))
}

async fn with_html_extension(mut req: Request) -> Request {
    let uri = req.uri();
    if uri.path().ends_with('/') {
        return req;
    }

    let path_and_query = match uri.query() {
        Some(query) => format!("{}.html?{query}", uri.path()),
        None => format!("{}.html", uri.path()),
    };
    if let Ok(rewritten) = Uri::builder().path_and_query(path_and_query).build() {
        *req.uri_mut() = rewritten;
    }
    req
}
