//! Repository trait definitions for the domain layer.
//!
//! These traits are the injected storage engine seams. Concrete engines live in
//! `crate::infrastructure::persistence`; mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`RedirectRepository`] - redirect table
//! - [`StatsRepository`] - hit counters

pub mod redirect_repository;
pub mod stats_repository;

pub use redirect_repository::RedirectRepository;
pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use redirect_repository::MockRedirectRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
