//! In-memory [`GameStore`] for tests and local development.
//!
//! Semantically equivalent to the `PostgreSQL` implementation, including
//! the compare-and-swap behavior: a mutation whose preconditions no
//! longer hold returns [`DbError::Conflict`] and changes nothing. All
//! state lives behind one async mutex, which also gives the store the
//! same per-account serialization guarantee the database provides.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use clicker_types::{
    AccountId, BoosterDefinition, BoosterId, DailyBoosterDefinition, DailyBoosterGrant,
    DailyBoosterId, DailyBoosterStatus, GameProfile, OwnedBoosterLevel, ProfileId, UserBoosterId,
    UserBoosterLevel,
};

use crate::error::DbError;
use crate::store::{GameStore, ProfileUpdate, UpgradeApply};

/// All tables of the game schema, in maps.
#[derive(Debug, Default)]
struct Inner {
    profiles: BTreeMap<AccountId, GameProfile>,
    boosters: BTreeMap<BoosterId, BoosterDefinition>,
    user_boosters: BTreeMap<(ProfileId, BoosterId), UserBoosterLevel>,
    daily_boosters: BTreeMap<DailyBoosterId, DailyBoosterDefinition>,
    grants: BTreeMap<(ProfileId, DailyBoosterId), DailyBoosterGrant>,
}

impl Inner {
    fn profile_by_id_mut(&mut self, id: ProfileId) -> Option<&mut GameProfile> {
        self.profiles.values_mut().find(|profile| profile.id == id)
    }
}

/// In-memory game store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a daily-booster grant directly, bypassing the catalog.
    ///
    /// Test hook standing in for the external refill scheduler, which
    /// owns grant rows in production.
    pub async fn put_grant(&self, grant: DailyBoosterGrant) {
        let mut inner = self.inner.lock().await;
        inner
            .grants
            .insert((grant.profile_id, grant.daily_booster_id), grant);
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn fetch_or_create_profile(
        &self,
        owner: AccountId,
        initial_energy: f64,
    ) -> Result<GameProfile, DbError> {
        let mut inner = self.inner.lock().await;
        let profile = inner.profiles.entry(owner).or_insert_with(|| {
            let now = Utc::now();
            GameProfile {
                id: ProfileId::new(),
                owner,
                point_balance: 0,
                total_earned_points: 0,
                energy_balance: initial_energy,
                last_energy_updated_at: now,
                last_point_updated_at: now,
                version: 0,
                created_at: now,
            }
        });
        Ok(profile.clone())
    }

    async fn get_profile(&self, owner: AccountId) -> Result<GameProfile, DbError> {
        let inner = self.inner.lock().await;
        inner
            .profiles
            .get(&owner)
            .cloned()
            .ok_or_else(|| DbError::NotFound {
                what: format!("game profile for account {owner}"),
            })
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<GameProfile, DbError> {
        let mut inner = self.inner.lock().await;
        let Some(profile) = inner.profile_by_id_mut(update.id) else {
            return Err(DbError::NotFound {
                what: format!("game profile {}", update.id),
            });
        };
        if profile.version != update.expected_version {
            return Err(DbError::Conflict {
                entity: "game_profile",
            });
        }
        profile.point_balance = update.point_balance;
        profile.total_earned_points = update.total_earned_points;
        profile.energy_balance = update.energy_balance;
        profile.last_energy_updated_at = update.last_energy_updated_at;
        profile.last_point_updated_at = update.last_point_updated_at;
        profile.version = profile.version.saturating_add(1);
        Ok(profile.clone())
    }

    async fn booster_levels(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<OwnedBoosterLevel>, DbError> {
        let inner = self.inner.lock().await;
        inner
            .user_boosters
            .values()
            .filter(|owned| owned.profile_id == profile_id)
            .map(|owned| {
                let booster =
                    inner
                        .boosters
                        .get(&owned.booster_id)
                        .ok_or_else(|| DbError::NotFound {
                            what: format!("booster {}", owned.booster_id),
                        })?;
                Ok(OwnedBoosterLevel {
                    booster: booster.clone(),
                    level: owned.level,
                })
            })
            .collect()
    }

    async fn list_boosters(&self) -> Result<Vec<BoosterDefinition>, DbError> {
        let inner = self.inner.lock().await;
        let mut boosters: Vec<BoosterDefinition> = inner.boosters.values().cloned().collect();
        boosters.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(boosters)
    }

    async fn get_booster(&self, id: BoosterId) -> Result<BoosterDefinition, DbError> {
        let inner = self.inner.lock().await;
        inner
            .boosters
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::NotFound {
                what: format!("booster {id}"),
            })
    }

    async fn ensure_user_booster(
        &self,
        profile_id: ProfileId,
        booster_id: BoosterId,
    ) -> Result<UserBoosterLevel, DbError> {
        let mut inner = self.inner.lock().await;
        let owned = inner
            .user_boosters
            .entry((profile_id, booster_id))
            .or_insert_with(|| UserBoosterLevel {
                id: UserBoosterId::new(),
                profile_id,
                booster_id,
                level: 0,
            });
        Ok(owned.clone())
    }

    async fn apply_upgrade(
        &self,
        apply: &UpgradeApply,
    ) -> Result<(GameProfile, UserBoosterLevel), DbError> {
        let mut inner = self.inner.lock().await;

        // Validate every precondition before mutating anything; the lock
        // is held throughout, so the whole apply is one atomic unit.
        let key = (apply.profile_id, apply.booster_id);
        let Some(owned_level) = inner.user_boosters.get(&key).map(|owned| owned.level) else {
            return Err(DbError::NotFound {
                what: format!("user booster {}", apply.booster_id),
            });
        };
        if owned_level != apply.expected_level {
            tracing::debug!(
                expected = apply.expected_level,
                actual = owned_level,
                "upgrade raced: booster level moved"
            );
            return Err(DbError::Conflict {
                entity: "user_booster",
            });
        }

        let Some(profile) = inner.profile_by_id_mut(apply.profile_id) else {
            return Err(DbError::NotFound {
                what: format!("game profile {}", apply.profile_id),
            });
        };
        if profile.version != apply.expected_version || profile.point_balance < apply.cost {
            return Err(DbError::Conflict {
                entity: "game_profile",
            });
        }
        profile.point_balance = profile.point_balance.saturating_sub(apply.cost);
        profile.version = profile.version.saturating_add(1);
        let profile_snapshot = profile.clone();

        let Some(owned) = inner.user_boosters.get_mut(&key) else {
            return Err(DbError::NotFound {
                what: format!("user booster {}", apply.booster_id),
            });
        };
        owned.level = owned.level.saturating_add(1);
        let owned_snapshot = owned.clone();

        Ok((profile_snapshot, owned_snapshot))
    }

    async fn daily_boosters(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<DailyBoosterStatus>, DbError> {
        let inner = self.inner.lock().await;
        let mut statuses: Vec<DailyBoosterStatus> = inner
            .daily_boosters
            .values()
            .map(|definition| DailyBoosterStatus {
                definition: definition.clone(),
                grant: inner.grants.get(&(profile_id, definition.id)).cloned(),
            })
            .collect();
        statuses.sort_by(|a, b| a.definition.title.cmp(&b.definition.title));
        Ok(statuses)
    }

    async fn seed_booster(&self, booster: &BoosterDefinition) -> Result<(), DbError> {
        let mut inner = self.inner.lock().await;
        inner.boosters.insert(booster.id, booster.clone());
        Ok(())
    }

    async fn seed_daily_booster(&self, booster: &DailyBoosterDefinition) -> Result<(), DbError> {
        let mut inner = self.inner.lock().await;
        inner.daily_boosters.insert(booster.id, booster.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_from(profile: &GameProfile) -> ProfileUpdate {
        ProfileUpdate {
            id: profile.id,
            expected_version: profile.version,
            point_balance: profile.point_balance,
            total_earned_points: profile.total_earned_points,
            energy_balance: profile.energy_balance,
            last_energy_updated_at: profile.last_energy_updated_at,
            last_point_updated_at: profile.last_point_updated_at,
        }
    }

    #[tokio::test]
    async fn fetch_or_create_is_idempotent() {
        let store = MemoryStore::new();
        let owner = AccountId::new();
        let first = store.fetch_or_create_profile(owner, 100.0).await;
        let second = store.fetch_or_create_profile(owner, 100.0).await;
        match (first, second) {
            (Ok(first), Ok(second)) => assert_eq!(first, second),
            other => assert!(false, "both fetches must succeed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stale_version_update_conflicts() {
        let store = MemoryStore::new();
        let owner = AccountId::new();
        let Ok(profile) = store.fetch_or_create_profile(owner, 0.0).await else {
            return assert!(false, "profile creation failed");
        };

        let mut winning = update_from(&profile);
        winning.point_balance = 10;
        assert!(store.update_profile(&winning).await.is_ok());

        // The same expected_version again: someone else won the race.
        let mut losing = update_from(&profile);
        losing.point_balance = 99;
        let result = store.update_profile(&losing).await;
        assert!(matches!(result, Err(DbError::Conflict { .. })));

        // The winning write is intact.
        let Ok(stored) = store.get_profile(owner).await else {
            return assert!(false, "profile lookup failed");
        };
        assert_eq!(stored.point_balance, 10);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn upgrade_with_exact_balance_spends_it_once() {
        let store = MemoryStore::new();
        let owner = AccountId::new();
        let booster = BoosterDefinition {
            id: BoosterId::new(),
            title: String::from("Multitap"),
            description: String::new(),
            base_price: 1000,
            booster_type: clicker_types::BoosterType::Multitap,
        };
        assert!(store.seed_booster(&booster).await.is_ok());

        let Ok(created) = store.fetch_or_create_profile(owner, 0.0).await else {
            return assert!(false, "profile creation failed");
        };
        let mut funded = update_from(&created);
        funded.point_balance = 1000;
        let Ok(profile) = store.update_profile(&funded).await else {
            return assert!(false, "funding update failed");
        };
        let Ok(owned) = store.ensure_user_booster(profile.id, booster.id).await else {
            return assert!(false, "user booster creation failed");
        };

        let apply = UpgradeApply {
            profile_id: profile.id,
            expected_version: profile.version,
            booster_id: booster.id,
            expected_level: owned.level,
            cost: 1000,
        };

        // First apply wins.
        match store.apply_upgrade(&apply).await {
            Ok((after, owned_after)) => {
                assert_eq!(after.point_balance, 0);
                assert_eq!(owned_after.level, 1);
            }
            Err(error) => assert!(false, "first upgrade must succeed, got {error}"),
        }

        // Second apply against the same read loses on the version check
        // and leaves no trace.
        let result = store.apply_upgrade(&apply).await;
        assert!(matches!(result, Err(DbError::Conflict { .. })));
        let Ok(stored) = store.get_profile(owner).await else {
            return assert!(false, "profile lookup failed");
        };
        assert_eq!(stored.point_balance, 0);
    }

    #[tokio::test]
    async fn failed_upgrade_leaves_state_unchanged() {
        let store = MemoryStore::new();
        let owner = AccountId::new();
        let booster_id = BoosterId::new();
        let Ok(profile) = store.fetch_or_create_profile(owner, 0.0).await else {
            return assert!(false, "profile creation failed");
        };

        // No user_booster row exists: the debit must be rolled back.
        let apply = UpgradeApply {
            profile_id: profile.id,
            expected_version: profile.version,
            booster_id,
            expected_level: 0,
            cost: 0,
        };
        let result = store.apply_upgrade(&apply).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));

        let Ok(stored) = store.get_profile(owner).await else {
            return assert!(false, "profile lookup failed");
        };
        assert_eq!(stored.version, profile.version);
        assert_eq!(stored.point_balance, profile.point_balance);
    }

    #[tokio::test]
    async fn daily_boosters_report_missing_grants_as_none() {
        let store = MemoryStore::new();
        let owner = AccountId::new();
        let Ok(profile) = store.fetch_or_create_profile(owner, 0.0).await else {
            return assert!(false, "profile creation failed");
        };
        let definition = DailyBoosterDefinition {
            id: DailyBoosterId::new(),
            title: String::from("Energy refill"),
            description: String::new(),
            booster_type: clicker_types::DailyBoosterType::DailyRefill,
            max_available: 6,
        };
        assert!(store.seed_daily_booster(&definition).await.is_ok());

        let Ok(statuses) = store.daily_boosters(profile.id).await else {
            return assert!(false, "daily booster listing failed");
        };
        assert_eq!(statuses.len(), 1);
        assert!(statuses.iter().all(|status| status.grant.is_none()));
    }
}
