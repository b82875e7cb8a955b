//! Storage-shaped records for the game schema.
//!
//! These are the explicitly typed rows the persistence layer reads and
//! writes. Absence of a relation row (a booster never upgraded, a daily
//! booster never consumed) is represented as an explicit `Option` or an
//! explicit default at the conversion site, never as untyped optional
//! field access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BoosterType, DailyBoosterType};
use crate::ids::{AccountId, BoosterId, DailyBoosterId, ProfileId, UserBoosterId};

// ---------------------------------------------------------------------------
// Game profile
// ---------------------------------------------------------------------------

/// Authoritative per-account game state.
///
/// Invariants maintained by the store and the reconciliation engine:
///
/// - `point_balance >= 0` and `total_earned_points >= 0`
/// - `total_earned_points` is monotonically non-decreasing
/// - `energy_balance` never exceeds the energy cap derived from the
///   account's energy-limit booster level
/// - `last_point_updated_at` is non-decreasing across accepted writes
///
/// `version` is the optimistic-concurrency token: every successful write
/// increments it, and conditional writes compare against the value read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameProfile {
    /// Row identifier.
    pub id: ProfileId,
    /// The owning account. Exactly one profile exists per account.
    pub owner: AccountId,
    /// Spendable currency.
    pub point_balance: i64,
    /// Lifetime earned points; drives tier progression.
    pub total_earned_points: i64,
    /// Current energy. Fractional values occur when the refill interval
    /// is longer than one second (the per-second charge rate is then
    /// below 1.0).
    pub energy_balance: f64,
    /// Watermark of the last energy mutation.
    pub last_energy_updated_at: DateTime<Utc>,
    /// Watermark of the last accepted point sync.
    pub last_point_updated_at: DateTime<Utc>,
    /// Optimistic-concurrency version, incremented on every write.
    pub version: i64,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Booster catalog
// ---------------------------------------------------------------------------

/// A purchasable booster catalog entry. Immutable after seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BoosterDefinition {
    /// Catalog identifier.
    pub id: BoosterId,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Price of the level 0 -> 1 upgrade; later levels scale along the
    /// type-specific exponential curve.
    pub base_price: i64,
    /// Which upgrade curve and derived quantity this booster feeds.
    pub booster_type: BoosterType,
}

/// A profile's owned level for one booster.
///
/// Created lazily at level 0 on the first upgrade attempt, then
/// incremented monotonically by the upgrade transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserBoosterLevel {
    /// Row identifier.
    pub id: UserBoosterId,
    /// The owning profile.
    pub profile_id: ProfileId,
    /// The catalog entry this level applies to.
    pub booster_id: BoosterId,
    /// Current level. Level 0 already grants the base benefit.
    pub level: u32,
}

/// A booster catalog entry joined with the requesting profile's level.
///
/// The level is 0 when the profile has never upgraded the booster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedBoosterLevel {
    /// The catalog entry.
    pub booster: BoosterDefinition,
    /// The profile's current level for it.
    pub level: u32,
}

// ---------------------------------------------------------------------------
// Daily boosters
// ---------------------------------------------------------------------------

/// A daily (capped-use) booster catalog entry. Immutable after seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DailyBoosterDefinition {
    /// Catalog identifier.
    pub id: DailyBoosterId,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Which consumable this entry is.
    pub booster_type: DailyBoosterType,
    /// Maximum uses per day; the external scheduler resets grants to this.
    pub max_available: u32,
}

/// A profile's remaining uses of one daily booster.
///
/// `remaining` is decremented on consumption and reset by an external
/// scheduler. The engine only ever reads this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DailyBoosterGrant {
    /// The owning profile.
    pub profile_id: ProfileId,
    /// The catalog entry this grant applies to.
    pub daily_booster_id: DailyBoosterId,
    /// Uses left today. Always `<= max_available` of the definition.
    pub remaining: u32,
    /// When the scheduler last reset this grant.
    pub last_refilled_at: DateTime<Utc>,
}

/// A daily booster catalog entry joined with the requesting profile's
/// grant, if one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBoosterStatus {
    /// The catalog entry.
    pub definition: DailyBoosterDefinition,
    /// The profile's grant; `None` when the profile has never consumed
    /// this booster (treated as a full allowance by display code and as
    /// zero refills-used by the context).
    pub grant: Option<DailyBoosterGrant>,
}
