//! Persistence layer for the clicker game backend.
//!
//! Durable state lives in `PostgreSQL`; the API consumes it through the
//! [`GameStore`] trait so tests and local development can run against
//! the in-memory implementation with identical semantics.
//!
//! # Concurrency model
//!
//! There is no in-process shared mutable state: per-account
//! serialization is enforced by optimistic concurrency in the store.
//! Every profile mutation is a compare-and-swap on the row `version`;
//! the booster upgrade additionally conditions on the owned level and
//! the balance inside a single transaction. A failed condition surfaces
//! as [`DbError::Conflict`] -- never a silent stale write -- and the
//! caller retries at most once.
//!
//! # Modules
//!
//! - [`store`] -- The [`GameStore`] contract and its write descriptors
//! - [`postgres`] -- Connection pool, configuration, migration runner
//! - [`pg_store`] -- `PostgreSQL` implementation
//! - [`memory`] -- In-memory implementation for tests and development
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod pg_store;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use memory::MemoryStore;
pub use pg_store::PgStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use store::{GameStore, ProfileUpdate, UpgradeApply};
