//! Axum HTTP layer for the clicker game backend.
//!
//! Thin I/O wrappers around the rules engine: every handler resolves the
//! caller's identity, loads state through the [`clicker_db::GameStore`]
//! trait, runs the pure `clicker-engine` rules, and commits through the
//! store's compare-and-swap operations with a retry-once conflict
//! policy.
//!
//! # Modules
//!
//! - [`auth`] -- Bearer-token extraction and the identity provider trait
//! - [`state`] -- Shared [`state::AppState`] for all handlers
//! - [`context`] -- [`clicker_types::GameContext`] assembly from records
//! - [`handlers`] -- The five REST endpoints
//! - [`router`] -- Route table and middleware
//! - [`server`] -- TCP bind-and-serve lifecycle
//! - [`error`] -- [`error::ApiError`] and its HTTP status mapping

pub mod auth;
pub mod context;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use auth::{AuthError, HttpIdentityProvider, IdentityProvider, StaticIdentityProvider};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
