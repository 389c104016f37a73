//! Request helpers shared by the API and web layers.
//!
//! - [`host`] - Host extraction from HTTP headers
//! - [`cookies`] - Session cookie parsing and construction

pub mod cookies;
pub mod host;
