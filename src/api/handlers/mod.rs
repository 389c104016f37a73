//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod redirects;
pub mod session;
pub mod stats;

pub use health::health_handler;
pub use redirect::{redirect_default_handler, redirect_handler};
pub use redirects::{
    create_redirect_handler, delete_redirect_handler, list_redirects_handler,
    update_redirect_handler,
};
pub use session::{login_handler, logout_handler};
pub use stats::stats_handler;
