//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, RedirectStore};
use crate::domain::repositories::{RedirectRepository, StatsRepository};
use crate::infrastructure::persistence::{MemoryRedirectRepository, MemoryStatsRepository};

/// The store as held by the HTTP layer, over whichever storage engine was configured.
pub type SharedStore = RedirectStore<dyn RedirectRepository, dyn StatsRepository>;

/// State shared by all request handlers.
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SharedStore>,
    pub auth_service: Arc<AuthService>,
    /// Host name (without port) that serves the management surface.
    pub management_host: Arc<str>,
}

impl AppState {
    pub fn new(store: SharedStore, auth_service: AuthService, management_host: &str) -> Self {
        Self {
            store: Arc::new(store),
            auth_service: Arc::new(auth_service),
            management_host: Arc::from(management_host.to_ascii_lowercase()),
        }
    }

    /// State over the non-durable in-memory engine.
    pub fn in_memory(auth_service: AuthService, management_host: &str) -> Self {
        let table = Arc::new(MemoryRedirectRepository::new());
        let stats: Arc<dyn StatsRepository> =
            Arc::new(MemoryStatsRepository::bound_to(table.clone()));
        let redirects: Arc<dyn RedirectRepository> = table;

        Self::new(
            RedirectStore::new(redirects, stats),
            auth_service,
            management_host,
        )
    }
}
