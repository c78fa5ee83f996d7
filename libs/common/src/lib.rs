//! Common library for the social backend services
//!
//! Shared building blocks: PostgreSQL pool and migrations, error types,
//! bearer tokens, the on-disk media store, story expiry rules and layered
//! configuration.

pub mod database;
pub mod error;
pub mod expiry;
pub mod settings;
pub mod storage;
pub mod token;

pub use database::{DatabaseConfig, health_check, init_pool, lazy_pool, run_migrations};
