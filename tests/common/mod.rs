#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use slug_redirector::application::services::{AuthService, hash_password};
use slug_redirector::domain::entities::RedirectFields;
use slug_redirector::prelude::{RateLimit, app_router};
use slug_redirector::state::AppState;
use std::net::SocketAddr;
use tower::Layer;

pub const MANAGEMENT_HOST: &str = "admin.test";
pub const REDIRECT_HOST: &str = "go.test";
pub const SECRET: &str = "hunter2";
pub const STATIC_DIR: &str = "tests/fixtures/public";

/// In-memory state with [`SECRET`] as the administrator password.
pub fn create_test_state() -> AppState {
    AppState::in_memory(AuthService::new(Some(SECRET)), MANAGEMENT_HOST)
}

/// In-memory state with no administrator password configured.
pub fn create_locked_state() -> AppState {
    AppState::in_memory(AuthService::new(None), MANAGEMENT_HOST)
}

/// Full application router without rate limiting.
pub fn make_server(state: AppState) -> TestServer {
    TestServer::new(app_router(state, RateLimit::Disabled, STATIC_DIR)).unwrap()
}

/// Full application router keyed on a fixed peer address.
pub fn make_rate_limited_server(state: AppState) -> TestServer {
    let app = app_router(state, RateLimit::PeerIp, STATIC_DIR).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

/// Value of the `auth` cookie after a successful login.
pub fn credential() -> String {
    hash_password(SECRET)
}

pub fn auth_cookie() -> String {
    format!("auth={}", credential())
}

pub async fn seed(state: &AppState, key: &str, fields: RedirectFields) {
    state.store.add(key, fields).await.unwrap();
}

pub async fn seed_literal(state: &AppState, key: &str, url: &str) {
    seed(state, key, RedirectFields::to(url)).await;
}

pub async fn seed_pattern(state: &AppState, pattern: &str, url: &str) {
    seed(state, pattern, RedirectFields::to(url).allow_regex(true)).await;
}

/// Inserts a fixed `ConnectInfo` so per-IP rate limiting has a key.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
