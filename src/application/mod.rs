//! Application layer services.
//!
//! Services orchestrate domain rules over the repository traits and give the
//! HTTP handlers and the admin CLI a single API.
//!
//! - [`services::RedirectStore`] - redirect validation, resolution and hit counting
//! - [`services::AuthService`] - administrator credential checks

pub mod services;
