//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// How clients are identified for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimit {
    /// No limits. Used by tests, which have no peer address.
    Disabled,
    /// Key on the socket peer address.
    PeerIp,
    /// Key on `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, falling back to
    /// the peer address. Only safe behind a trusted reverse proxy.
    ProxyHeaders,
}

impl RateLimit {
    pub fn from_config(behind_proxy: bool) -> Self {
        if behind_proxy {
            RateLimit::ProxyHeaders
        } else {
            RateLimit::PeerIp
        }
    }
}

/// Token bucket parameters.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    /// Seconds to replenish one request.
    pub replenish_secs: u64,
    pub burst: u32,
}

/// Login attempts: one every 2 seconds, burst of 10.
pub const LOGIN: Quota = Quota {
    replenish_secs: 2,
    burst: 10,
};

/// Management API: one every second, burst of 100.
pub const ADMIN: Quota = Quota {
    replenish_secs: 1,
    burst: 100,
};

/// Wraps `router` in a per-client rate limiter.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let login = rate_limit::apply(
///     Router::new().route("/login", post(login_handler)),
///     RateLimit::PeerIp,
///     rate_limit::LOGIN,
/// );
/// ```
pub fn apply<S>(router: Router<S>, mode: RateLimit, quota: Quota) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    match mode {
        RateLimit::Disabled => router,
        RateLimit::PeerIp => {
            let governor_conf = Arc::new(
                GovernorConfigBuilder::default()
                    .key_extractor(PeerIpKeyExtractor)
                    .per_second(quota.replenish_secs)
                    .burst_size(quota.burst)
                    .finish()
                    .expect("rate limit quota is non-zero"),
            );
            router.layer(GovernorLayer::new(governor_conf))
        }
        RateLimit::ProxyHeaders => {
            let governor_conf = Arc::new(
                GovernorConfigBuilder::default()
                    .key_extractor(SmartIpKeyExtractor)
                    .per_second(quota.replenish_secs)
                    .burst_size(quota.burst)
                    .finish()
                    .expect("rate limit quota is non-zero"),
            );
            router.layer(GovernorLayer::new(governor_conf))
        }
    }
}
