//! Management host pages.
//!
//! Serves the dashboard's static assets and redirects browsers between the
//! login page and the dashboard based on their session.
//!
//! # Modules
//!
//! - [`middleware`] - Session-based page guard
//! - [`routes`] - Static page routing

pub mod middleware;
pub mod routes;
