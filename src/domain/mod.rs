//! Domain layer: redirect records, pattern rewriting and storage seams.
//!
//! - [`entities`] - redirect records, defaults and validation
//! - [`rewrite`] - pattern compilation and capture-group substitution
//! - [`repositories`] - storage trait definitions
//!
//! The domain layer has no dependency on the HTTP or infrastructure layers.
//! Orchestration lives in [`crate::application::services::RedirectStore`].

pub mod entities;
pub mod repositories;
pub mod rewrite;
