//! Storage engine implementations of the domain repository traits.
//!
//! # Engines
//!
//! - [`MemoryRedirectRepository`] / [`MemoryStatsRepository`] - process memory, non-durable
//! - [`PgRedirectRepository`] / [`PgStatsRepository`] - PostgreSQL via SQLx
//!
//! The PostgreSQL schema lives in `migrations/` and is applied at startup.

pub mod memory_redirect_repository;
pub mod memory_stats_repository;
pub mod pg_redirect_repository;
pub mod pg_stats_repository;

pub use memory_redirect_repository::MemoryRedirectRepository;
pub use memory_stats_repository::MemoryStatsRepository;
pub use pg_redirect_repository::PgRedirectRepository;
pub use pg_stats_repository::PgStatsRepository;
