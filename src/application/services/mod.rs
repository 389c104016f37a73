//! Business logic services for the application layer.

pub mod auth_service;
pub mod redirect_store;

pub use auth_service::{AuthService, hash_password};
pub use redirect_store::{RedirectStore, Resolution};
