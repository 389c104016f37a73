//! HTTP middleware for request processing and protection.
//!
//! Provides host splitting, authentication, rate limiting, and observability middleware.

pub mod auth;
pub mod host_split;
pub mod rate_limit;
pub mod tracing;
