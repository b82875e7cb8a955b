//! Shared application state for the game API server.
//!
//! [`AppState`] bundles the three collaborators every handler needs: the
//! persistence store, the identity provider, and the (immutable) economy
//! configuration plus tier table. Both collaborators sit behind trait
//! objects so tests can swap in the in-memory store and a static token
//! map.

use std::sync::Arc;

use clicker_db::GameStore;
use clicker_engine::config::GameConfig;
use clicker_engine::levels::LevelProgressionTable;

use crate::auth::IdentityProvider;

/// Everything the request handlers share.
pub struct AppState {
    /// Durable game state.
    pub store: Arc<dyn GameStore>,
    /// Credential resolution.
    pub identity: Arc<dyn IdentityProvider>,
    /// Economy tunables, threaded into every rule call.
    pub game: GameConfig,
    /// Tier ladder for `total_earned_points`.
    pub levels: LevelProgressionTable,
}

impl AppState {
    /// Assemble the state from its collaborators.
    pub fn new(
        store: Arc<dyn GameStore>,
        identity: Arc<dyn IdentityProvider>,
        game: GameConfig,
        levels: LevelProgressionTable,
    ) -> Self {
        Self {
            store,
            identity,
            game,
            levels,
        }
    }
}
