//! REST API endpoint handlers for the game server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/game/context` | Fetch-or-create the profile, bank regeneration |
//! | `POST` | `/api/game/sync` | Validate and merge a client progress snapshot |
//! | `GET` | `/api/boosters` | Booster catalog with per-account level and price |
//! | `POST` | `/api/boosters/upgrade` | Buy one booster level |
//! | `GET` | `/api/boosters/daily` | Daily booster catalog with remaining uses |
//!
//! All handlers authenticate the bearer token first. Mutations go
//! through the store's compare-and-swap operations; on a write conflict
//! the handler re-reads, re-validates and retries exactly once before
//! surfacing the conflict.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;

use clicker_db::{ProfileUpdate, UpgradeApply};
use clicker_engine::reconcile::{self, ProfileView};
use clicker_engine::{curve, energy, upgrade};
use clicker_types::{
    AccountId, BoosterWithContext, DailyBoosterWithContext, GameContext, SyncRequest,
    UpgradeRequest,
};

use crate::auth::bearer_token;
use crate::context;
use crate::error::ApiError;
use crate::state::AppState;

/// How many times a conflicted commit is attempted in total.
///
/// One initial attempt plus one retry: a conflict means another request
/// for the same account won the race, so the second read is fresh; a
/// second conflict is surfaced as transient.
const COMMIT_ATTEMPTS: u32 = 2;

/// Resolve the request's bearer token to an account.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AccountId, ApiError> {
    let token = bearer_token(headers)?;
    Ok(state.identity.resolve(token).await?)
}

// ---------------------------------------------------------------------------
// POST /api/game/context
// ---------------------------------------------------------------------------

/// Fetch the account's game context, creating the profile on first call.
///
/// Opportunistically banks regenerated energy: if the stored balance is
/// below the cap and at least one whole second elapsed, the regenerated
/// balance and the advanced watermark are committed before the context
/// is built. A racing writer is not an error for this read path -- the
/// freshly written row is served instead.
pub async fn get_game_context(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<GameContext>, ApiError> {
    let account = authenticate(&state, &headers).await?;

    // New profiles start with a full energy bar at level 0 capacity.
    let initial_energy = context::energy_cap(&state.game, 0);
    let mut profile = state
        .store
        .fetch_or_create_profile(account, initial_energy)
        .await?;

    let owned = state.store.booster_levels(profile.id).await?;
    let levels = context::booster_levels(&owned);
    let cap = context::energy_cap(&state.game, levels.energy_limit);

    if profile.energy_balance < cap {
        let now = Utc::now();
        let restored = energy::restored_energy(
            profile.last_energy_updated_at,
            now,
            state.game.energy_refill_interval_ms,
        );
        if restored > 0.0 {
            let update = ProfileUpdate {
                id: profile.id,
                expected_version: profile.version,
                point_balance: profile.point_balance,
                total_earned_points: profile.total_earned_points,
                energy_balance: energy::regenerate(profile.energy_balance, restored, cap),
                last_energy_updated_at: now,
                last_point_updated_at: profile.last_point_updated_at,
            };
            match state.store.update_profile(&update).await {
                Ok(updated) => profile = updated,
                Err(error) if error.is_conflict() => {
                    // Another request banked its own regeneration; serve
                    // the row it wrote rather than failing a read.
                    profile = state.store.get_profile(account).await?;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    let daily = state.store.daily_boosters(profile.id).await?;
    Ok(Json(context::build_game_context(
        &profile,
        &owned,
        &daily,
        &state.game,
        &state.levels,
        Utc::now(),
    )))
}

// ---------------------------------------------------------------------------
// POST /api/game/sync
// ---------------------------------------------------------------------------

/// Validate a client-reported snapshot and merge it into the profile.
///
/// Rejections come back as 412 with the computed bounds in the message;
/// the stored profile is untouched in every rejection case.
pub async fn sync_game_context(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(report): Json<SyncRequest>,
) -> Result<Json<GameContext>, ApiError> {
    let account = authenticate(&state, &headers).await?;

    for attempt in 0..COMMIT_ATTEMPTS {
        let profile = state.store.get_profile(account).await?;
        let owned = state.store.booster_levels(profile.id).await?;
        let levels = context::booster_levels(&owned);
        let view = ProfileView::new(&profile, levels.multitap, levels.energy_limit);

        let accepted = match reconcile::reconcile(&view, &report, &state.game) {
            Ok(accepted) => accepted,
            Err(rejection) => {
                // Audit trail: every anti-cheat rejection is logged with
                // the computed bounds, never silently dropped.
                tracing::warn!(
                    account = %account,
                    claimed_points = report.points,
                    claimed_energy = report.current_energy,
                    claimed_timestamp = report.timestamp,
                    %rejection,
                    "sync rejected"
                );
                return Err(rejection.into());
            }
        };

        let update = ProfileUpdate {
            id: profile.id,
            expected_version: profile.version,
            point_balance: accepted.point_balance,
            total_earned_points: accepted.total_earned_points,
            energy_balance: accepted.energy_balance,
            last_energy_updated_at: accepted.updated_at,
            last_point_updated_at: accepted.updated_at,
        };
        match state.store.update_profile(&update).await {
            Ok(updated) => {
                let daily = state.store.daily_boosters(updated.id).await?;
                return Ok(Json(context::build_game_context(
                    &updated,
                    &owned,
                    &daily,
                    &state.game,
                    &state.levels,
                    Utc::now(),
                )));
            }
            Err(error) if error.is_conflict() && attempt == 0 => {
                tracing::debug!(account = %account, "sync commit raced, revalidating");
            }
            Err(error) => return Err(error.into()),
        }
    }

    Err(ApiError::Conflict(String::from("sync retry exhausted")))
}

// ---------------------------------------------------------------------------
// GET /api/boosters
// ---------------------------------------------------------------------------

/// The booster catalog with the account's level and next price for each.
pub async fn list_boosters(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BoosterWithContext>>, ApiError> {
    let account = authenticate(&state, &headers).await?;
    let profile = state.store.get_profile(account).await?;
    let owned = state.store.booster_levels(profile.id).await?;
    let catalog = state.store.list_boosters().await?;

    let boosters = catalog
        .into_iter()
        .map(|booster| {
            let level = owned
                .iter()
                .find(|owned_level| owned_level.booster.id == booster.id)
                .map_or(0, |owned_level| owned_level.level);
            let multiplier = curve::price_multiplier(&state.game, booster.booster_type);
            BoosterWithContext {
                id: booster.id,
                current_price: curve::upgrade_cost(level, booster.base_price, multiplier),
                current_level: level,
                title: booster.title,
                description: booster.description,
                base_price: booster.base_price,
                booster_type: booster.booster_type,
            }
        })
        .collect();
    Ok(Json(boosters))
}

// ---------------------------------------------------------------------------
// POST /api/boosters/upgrade
// ---------------------------------------------------------------------------

/// Buy one level of a booster.
///
/// The check (balance covers the cost) and the apply (debit plus level
/// increment) are one conditional store operation, so two concurrent
/// upgrades can never double-spend the same balance: the loser's write
/// conditions fail, it re-reads, and the re-check answers
/// `InsufficientPoints`.
pub async fn upgrade_booster(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<UpgradeRequest>,
) -> Result<Json<BoosterWithContext>, ApiError> {
    let account = authenticate(&state, &headers).await?;
    let booster = state.store.get_booster(request.id).await?;

    for attempt in 0..COMMIT_ATTEMPTS {
        let profile = state.store.get_profile(account).await?;
        let owned = state
            .store
            .ensure_user_booster(profile.id, booster.id)
            .await?;
        let quote =
            upgrade::quote_upgrade(&booster, owned.level, profile.point_balance, &state.game)?;

        let apply = UpgradeApply {
            profile_id: profile.id,
            expected_version: profile.version,
            booster_id: booster.id,
            expected_level: owned.level,
            cost: quote.cost,
        };
        match state.store.apply_upgrade(&apply).await {
            Ok((_, upgraded)) => {
                tracing::info!(
                    account = %account,
                    booster = %booster.id,
                    level = upgraded.level,
                    cost = quote.cost,
                    "booster upgraded"
                );
                return Ok(Json(BoosterWithContext {
                    id: booster.id,
                    title: booster.title.clone(),
                    description: booster.description.clone(),
                    base_price: booster.base_price,
                    booster_type: booster.booster_type,
                    current_level: upgraded.level,
                    current_price: quote.next_price,
                }));
            }
            Err(error) if error.is_conflict() && attempt == 0 => {
                tracing::debug!(account = %account, booster = %booster.id, "upgrade raced, revalidating");
            }
            Err(error) => return Err(error.into()),
        }
    }

    Err(ApiError::Conflict(String::from("upgrade retry exhausted")))
}

// ---------------------------------------------------------------------------
// GET /api/boosters/daily
// ---------------------------------------------------------------------------

/// The daily booster catalog with the account's remaining uses.
///
/// An account that never consumed a daily booster has no grant row and
/// is reported at the full allowance.
pub async fn list_daily_boosters(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<DailyBoosterWithContext>>, ApiError> {
    let account = authenticate(&state, &headers).await?;
    let profile = state.store.get_profile(account).await?;
    let daily = state.store.daily_boosters(profile.id).await?;

    let boosters = daily
        .into_iter()
        .map(|status| DailyBoosterWithContext {
            id: status.definition.id,
            title: status.definition.title,
            description: status.definition.description,
            max_amount: status.definition.max_available,
            remaining_amount: status
                .grant
                .map_or(status.definition.max_available, |grant| grant.remaining),
        })
        .collect();
    Ok(Json(boosters))
}
