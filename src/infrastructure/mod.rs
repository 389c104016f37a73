//! Infrastructure layer for external integrations.
//!
//! Implements the storage seams defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - in-memory and PostgreSQL storage engines

pub mod persistence;
