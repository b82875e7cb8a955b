//! Wire DTOs for the game API.
//!
//! Field names follow the JSON contract the TypeScript client already
//! speaks (camelCase). These types are exported to TypeScript via `ts-rs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::BoosterType;
use crate::ids::{BoosterId, DailyBoosterId};

// ---------------------------------------------------------------------------
// Game context
// ---------------------------------------------------------------------------

/// The full game context returned by the context and sync endpoints.
///
/// Everything the client needs to render the game screen and run the
/// client-side prediction loop: balances, booster levels, the derived
/// per-click quantities, and the regeneration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GameContext {
    /// Display name of the progression tier for `total_earned_points`.
    pub level_name: String,
    /// Energy capacity at the account's energy-limit booster level.
    pub energy_limit: i64,
    /// Daily energy refills left today.
    pub remaining_energy_refills: u32,
    /// Lifetime earned points.
    pub total_earned_points: i64,
    /// Spendable point balance.
    pub point_balance: i64,
    /// Current energy balance.
    pub energy_balance: f64,
    /// Multitap booster level.
    pub multitap_level: u32,
    /// Energy-limit booster level.
    pub energy_limit_level: u32,
    /// When the daily refill allowance was last reset.
    pub last_energy_refilled_at: DateTime<Utc>,
    /// Watermark of the last energy mutation.
    pub last_energy_updated_at: DateTime<Utc>,
    /// Watermark of the last accepted point sync.
    pub last_point_updated_at: DateTime<Utc>,
    /// Maximum daily energy refills.
    pub max_energy_refills_per_day: u32,
    /// Points earned per click at the current multitap level.
    pub point_earns_per_click: i64,
    /// Energy consumed per click. Always equals `point_earns_per_click`:
    /// one unit of energy per point-equivalent of click power.
    pub energy_consumes_per_click: i64,
    /// Energy refill interval in milliseconds (one charge per interval).
    pub energy_refill_interval: u64,
}

// ---------------------------------------------------------------------------
// Boosters
// ---------------------------------------------------------------------------

/// A booster catalog entry enriched with the requesting account's level
/// and the price of the next upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct BoosterWithContext {
    /// Catalog identifier.
    pub id: BoosterId,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Level 0 -> 1 price.
    pub base_price: i64,
    /// Booster kind.
    #[serde(rename = "type")]
    pub booster_type: BoosterType,
    /// The account's current level.
    pub current_level: u32,
    /// Price of the next upgrade at `current_level`.
    pub current_price: i64,
}

/// A daily booster catalog entry enriched with the requesting account's
/// remaining uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DailyBoosterWithContext {
    /// Catalog identifier.
    pub id: DailyBoosterId,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Maximum uses per day.
    pub max_amount: u32,
    /// Uses left today.
    pub remaining_amount: u32,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Client-reported progress snapshot submitted to the sync endpoint.
///
/// `timestamp` is epoch milliseconds as measured by the client clock.
/// The reconciliation engine validates the whole snapshot against what is
/// physically possible since the last accepted sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SyncRequest {
    /// Claimed total point balance.
    pub points: f64,
    /// Claimed current energy.
    pub current_energy: f64,
    /// Client clock at the moment of the snapshot, epoch milliseconds.
    pub timestamp: i64,
}

/// Request body for the booster upgrade endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UpgradeRequest {
    /// The booster to upgrade.
    pub id: BoosterId,
}
