//! Economy rules core for the clicker game backend.
//!
//! Everything in this crate is pure: functions read their arguments and
//! the injected [`config::GameConfig`], touch no clock, no storage and
//! no globals, and are therefore directly testable with alternate
//! tunables.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration and the YAML loader
//! - [`levels`] -- Tier progression table over lifetime earned points
//! - [`curve`] -- Exponential upgrade cost/benefit curves
//! - [`energy`] -- Energy regeneration over elapsed time
//! - [`reconcile`] -- Anti-cheat validation and merge of client snapshots
//! - [`upgrade`] -- Booster upgrade pricing and balance checks
//!
//! # Control flow
//!
//! The HTTP layer drives three entry points: the read path (fetch or
//! create a profile, opportunistically apply [`energy`] regeneration),
//! the write path ([`reconcile::reconcile`] validates and merges a
//! client snapshot), and the upgrade path ([`upgrade::quote_upgrade`]
//! prices a booster level). All three share [`curve`].

pub mod config;
pub mod curve;
pub mod energy;
pub mod levels;
pub mod reconcile;
pub mod upgrade;

// Re-export primary types at crate root.
pub use config::{AppConfig, ConfigError, GameConfig};
pub use levels::{LevelProgressionTable, LevelTableError, LevelTier};
pub use reconcile::{AcceptedSync, ProfileView, SyncRejection, reconcile};
pub use upgrade::{UpgradeError, UpgradeQuote, quote_upgrade};
