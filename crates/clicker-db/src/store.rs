//! The storage contract consumed by the game API.
//!
//! [`GameStore`] is the narrow interface between the reconciliation
//! engine and durable state: get-by-identity, lazily-create-on-conflict
//! upsert, compare-and-swap update, and the relational fetches for owned
//! booster levels and daily-booster grants. Two implementations exist --
//! [`crate::PgStore`] for production and [`crate::MemoryStore`] for
//! tests and local development -- with identical concurrency semantics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use clicker_types::{
    AccountId, BoosterDefinition, BoosterId, DailyBoosterDefinition, DailyBoosterStatus,
    GameProfile, OwnedBoosterLevel, ProfileId, UserBoosterLevel,
};

use crate::error::DbError;

/// A full conditional rewrite of a profile's mutable columns.
///
/// Applied only if the stored `version` still equals `expected_version`;
/// the write bumps the version by one. Fields the caller does not intend
/// to change carry the values read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileUpdate {
    /// The profile row to update.
    pub id: ProfileId,
    /// The version observed when the profile was read.
    pub expected_version: i64,
    /// New spendable balance.
    pub point_balance: i64,
    /// New lifetime earned points.
    pub total_earned_points: i64,
    /// New energy balance.
    pub energy_balance: f64,
    /// New energy watermark.
    pub last_energy_updated_at: DateTime<Utc>,
    /// New point watermark.
    pub last_point_updated_at: DateTime<Utc>,
}

/// The atomic check-and-apply of one booster upgrade.
///
/// Debits `cost` from the profile and increments the booster level by
/// one as a single all-or-nothing write, conditioned on the profile
/// version, the booster level, and the balance still covering the cost.
/// Any condition failing yields [`DbError::Conflict`] and no mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeApply {
    /// The paying profile.
    pub profile_id: ProfileId,
    /// The version observed when the profile was read.
    pub expected_version: i64,
    /// The booster being upgraded.
    pub booster_id: BoosterId,
    /// The level observed when the owned-booster row was read.
    pub expected_level: u32,
    /// Points to debit.
    pub cost: i64,
}

/// Persistent state operations scoped to the game schema.
///
/// Per-account serialization is enforced here: every mutation is a
/// compare-and-swap against the row state the caller read, so two
/// concurrent commits for the same account cannot both succeed against
/// the same stale read.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Get the profile owned by `owner`, creating it if absent.
    ///
    /// The upsert is idempotent and keyed by the owner identity; a
    /// freshly created profile starts with zero points and
    /// `initial_energy` energy.
    async fn fetch_or_create_profile(
        &self,
        owner: AccountId,
        initial_energy: f64,
    ) -> Result<GameProfile, DbError>;

    /// Get the profile owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no profile exists.
    async fn get_profile(&self, owner: AccountId) -> Result<GameProfile, DbError>;

    /// Conditionally rewrite a profile's mutable columns.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Conflict`] if the stored version no longer
    /// matches `expected_version`.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<GameProfile, DbError>;

    /// The booster levels owned by a profile, joined with their catalog
    /// entries. Boosters never upgraded have no row here.
    async fn booster_levels(&self, profile_id: ProfileId)
    -> Result<Vec<OwnedBoosterLevel>, DbError>;

    /// The full booster catalog.
    async fn list_boosters(&self) -> Result<Vec<BoosterDefinition>, DbError>;

    /// One booster catalog entry.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the id is not in the catalog.
    async fn get_booster(&self, id: BoosterId) -> Result<BoosterDefinition, DbError>;

    /// Get the owned-booster row for `(profile, booster)`, creating it
    /// at level 0 if absent. Idempotent.
    async fn ensure_user_booster(
        &self,
        profile_id: ProfileId,
        booster_id: BoosterId,
    ) -> Result<UserBoosterLevel, DbError>;

    /// Atomically debit the profile and increment the booster level.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Conflict`] if the profile version or booster
    /// level moved since they were read, or if the balance no longer
    /// covers the cost.
    async fn apply_upgrade(
        &self,
        apply: &UpgradeApply,
    ) -> Result<(GameProfile, UserBoosterLevel), DbError>;

    /// The daily-booster catalog joined with the profile's grants.
    async fn daily_boosters(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<DailyBoosterStatus>, DbError>;

    /// Insert or refresh one booster catalog entry. Used at startup.
    async fn seed_booster(&self, booster: &BoosterDefinition) -> Result<(), DbError>;

    /// Insert or refresh one daily-booster catalog entry. Used at startup.
    async fn seed_daily_booster(&self, booster: &DailyBoosterDefinition) -> Result<(), DbError>;
}
