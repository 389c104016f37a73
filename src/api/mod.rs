//! HTTP API layer for redirect resolution and management.
//!
//! This layer translates HTTP requests into [`crate::application::services::RedirectStore`]
//! operations and formats responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Host split, authentication, rate limiting and tracing
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
