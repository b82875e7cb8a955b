//! Axum router construction for the game API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for the browser-hosted game client.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the game server.
///
/// The router includes:
/// - `POST /api/game/context` -- fetch-or-create profile + regeneration
/// - `POST /api/game/sync` -- validate and merge a progress snapshot
/// - `GET /api/boosters` -- booster catalog with level and price
/// - `POST /api/boosters/upgrade` -- buy one booster level
/// - `GET /api/boosters/daily` -- daily boosters with remaining uses
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/game/context", post(handlers::get_game_context))
        .route("/api/game/sync", post(handlers::sync_game_context))
        .route("/api/boosters", get(handlers::list_boosters))
        .route("/api/boosters/upgrade", post(handlers::upgrade_booster))
        .route("/api/boosters/daily", get(handlers::list_daily_boosters))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
