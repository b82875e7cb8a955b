//! [`GameStore`] implementation backed by `PostgreSQL`.
//!
//! Every mutation is conditional: profile writes compare the stored
//! `version` against the value the caller read, and the upgrade
//! transaction additionally re-checks the booster level and the balance
//! inside one database transaction. A condition failing rolls the whole
//! write back and surfaces [`DbError::Conflict`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use clicker_types::{
    AccountId, BoosterDefinition, BoosterId, BoosterType, DailyBoosterDefinition,
    DailyBoosterGrant, DailyBoosterId, DailyBoosterStatus, DailyBoosterType, GameProfile,
    OwnedBoosterLevel, ProfileId, UserBoosterId, UserBoosterLevel,
};

use crate::error::DbError;
use crate::postgres::PostgresPool;
use crate::store::{GameStore, ProfileUpdate, UpgradeApply};

/// `PostgreSQL`-backed game store.
#[derive(Clone)]
pub struct PgStore {
    pool: PostgresPool,
}

impl PgStore {
    /// Wrap a connected pool.
    pub const fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Row types and conversions
// ---------------------------------------------------------------------------

/// Raw `game_profile` row.
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    owner: Uuid,
    point_balance: i64,
    total_earned_points: i64,
    energy_balance: f64,
    last_energy_updated_at: DateTime<Utc>,
    last_point_updated_at: DateTime<Utc>,
    version: i64,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for GameProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: ProfileId::from(row.id),
            owner: AccountId::from(row.owner),
            point_balance: row.point_balance,
            total_earned_points: row.total_earned_points,
            energy_balance: row.energy_balance,
            last_energy_updated_at: row.last_energy_updated_at,
            last_point_updated_at: row.last_point_updated_at,
            version: row.version,
            created_at: row.created_at,
        }
    }
}

/// Raw `booster` row.
#[derive(Debug, sqlx::FromRow)]
struct BoosterRow {
    id: Uuid,
    title: String,
    description: String,
    base_price: i64,
    booster_type: String,
}

impl TryFrom<BoosterRow> for BoosterDefinition {
    type Error = DbError;

    fn try_from(row: BoosterRow) -> Result<Self, DbError> {
        Ok(Self {
            id: BoosterId::from(row.id),
            title: row.title,
            description: row.description,
            base_price: row.base_price,
            booster_type: booster_type_from_db(&row.booster_type)?,
        })
    }
}

/// Raw `user_booster` row.
#[derive(Debug, sqlx::FromRow)]
struct UserBoosterRow {
    id: Uuid,
    game_profile_id: Uuid,
    booster_id: Uuid,
    level: i32,
}

impl TryFrom<UserBoosterRow> for UserBoosterLevel {
    type Error = DbError;

    fn try_from(row: UserBoosterRow) -> Result<Self, DbError> {
        Ok(Self {
            id: UserBoosterId::from(row.id),
            profile_id: ProfileId::from(row.game_profile_id),
            booster_id: BoosterId::from(row.booster_id),
            level: decode_level(row.level)?,
        })
    }
}

const fn booster_type_to_db(booster_type: BoosterType) -> &'static str {
    match booster_type {
        BoosterType::Multitap => "MULTITAP",
        BoosterType::EnergyLimit => "ENERGY_LIMIT",
    }
}

fn booster_type_from_db(value: &str) -> Result<BoosterType, DbError> {
    match value {
        "MULTITAP" => Ok(BoosterType::Multitap),
        "ENERGY_LIMIT" => Ok(BoosterType::EnergyLimit),
        other => Err(DbError::Decode {
            context: format!("unknown booster_type {other:?}"),
        }),
    }
}

const fn daily_booster_type_to_db(booster_type: DailyBoosterType) -> &'static str {
    match booster_type {
        DailyBoosterType::DailyRefill => "DAILY_REFILL",
    }
}

fn daily_booster_type_from_db(value: &str) -> Result<DailyBoosterType, DbError> {
    match value {
        "DAILY_REFILL" => Ok(DailyBoosterType::DailyRefill),
        other => Err(DbError::Decode {
            context: format!("unknown daily booster_type {other:?}"),
        }),
    }
}

fn decode_level(level: i32) -> Result<u32, DbError> {
    u32::try_from(level).map_err(|_| DbError::Decode {
        context: format!("negative booster level {level}"),
    })
}

fn decode_amount(amount: i32, column: &str) -> Result<u32, DbError> {
    u32::try_from(amount).map_err(|_| DbError::Decode {
        context: format!("negative {column} {amount}"),
    })
}

fn encode_level(level: u32, context: &'static str) -> Result<i32, DbError> {
    i32::try_from(level).map_err(|_| DbError::Decode {
        context: format!("{context} {level} exceeds storage range"),
    })
}

// ---------------------------------------------------------------------------
// GameStore implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl GameStore for PgStore {
    async fn fetch_or_create_profile(
        &self,
        owner: AccountId,
        initial_energy: f64,
    ) -> Result<GameProfile, DbError> {
        sqlx::query(
            "INSERT INTO game_profile (id, owner, energy_balance)
             VALUES ($1, $2, $3)
             ON CONFLICT (owner) DO NOTHING",
        )
        .bind(ProfileId::new().into_inner())
        .bind(owner.into_inner())
        .bind(initial_energy)
        .execute(self.pool.pool())
        .await?;

        self.get_profile(owner).await
    }

    async fn get_profile(&self, owner: AccountId) -> Result<GameProfile, DbError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, owner, point_balance, total_earned_points, energy_balance,
                    last_energy_updated_at, last_point_updated_at, version, created_at
             FROM game_profile
             WHERE owner = $1",
        )
        .bind(owner.into_inner())
        .fetch_optional(self.pool.pool())
        .await?;

        row.map(GameProfile::from).ok_or_else(|| DbError::NotFound {
            what: format!("game profile for account {owner}"),
        })
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<GameProfile, DbError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "UPDATE game_profile
             SET point_balance = $1,
                 total_earned_points = $2,
                 energy_balance = $3,
                 last_energy_updated_at = $4,
                 last_point_updated_at = $5,
                 version = version + 1
             WHERE id = $6 AND version = $7
             RETURNING id, owner, point_balance, total_earned_points, energy_balance,
                       last_energy_updated_at, last_point_updated_at, version, created_at",
        )
        .bind(update.point_balance)
        .bind(update.total_earned_points)
        .bind(update.energy_balance)
        .bind(update.last_energy_updated_at)
        .bind(update.last_point_updated_at)
        .bind(update.id.into_inner())
        .bind(update.expected_version)
        .fetch_optional(self.pool.pool())
        .await?;

        row.map(GameProfile::from).ok_or(DbError::Conflict {
            entity: "game_profile",
        })
    }

    async fn booster_levels(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<OwnedBoosterLevel>, DbError> {
        let rows = sqlx::query(
            "SELECT b.id, b.title, b.description, b.base_price, b.booster_type, ub.level
             FROM user_booster ub
             JOIN booster b ON b.id = ub.booster_id
             WHERE ub.game_profile_id = $1",
        )
        .bind(profile_id.into_inner())
        .fetch_all(self.pool.pool())
        .await?;

        rows.into_iter()
            .map(|row| -> Result<OwnedBoosterLevel, DbError> {
                let booster = BoosterDefinition {
                    id: BoosterId::from(row.try_get::<Uuid, _>("id")?),
                    title: row.try_get("title")?,
                    description: row.try_get("description")?,
                    base_price: row.try_get("base_price")?,
                    booster_type: booster_type_from_db(row.try_get::<String, _>("booster_type")?.as_str())?,
                };
                Ok(OwnedBoosterLevel {
                    booster,
                    level: decode_level(row.try_get("level")?)?,
                })
            })
            .collect()
    }

    async fn list_boosters(&self) -> Result<Vec<BoosterDefinition>, DbError> {
        let rows = sqlx::query_as::<_, BoosterRow>(
            "SELECT id, title, description, base_price, booster_type
             FROM booster
             ORDER BY title",
        )
        .fetch_all(self.pool.pool())
        .await?;

        rows.into_iter().map(BoosterDefinition::try_from).collect()
    }

    async fn get_booster(&self, id: BoosterId) -> Result<BoosterDefinition, DbError> {
        let row = sqlx::query_as::<_, BoosterRow>(
            "SELECT id, title, description, base_price, booster_type
             FROM booster
             WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.pool())
        .await?;

        row.map(BoosterDefinition::try_from)
            .transpose()?
            .ok_or_else(|| DbError::NotFound {
                what: format!("booster {id}"),
            })
    }

    async fn ensure_user_booster(
        &self,
        profile_id: ProfileId,
        booster_id: BoosterId,
    ) -> Result<UserBoosterLevel, DbError> {
        sqlx::query(
            "INSERT INTO user_booster (id, game_profile_id, booster_id, level)
             VALUES ($1, $2, $3, 0)
             ON CONFLICT (game_profile_id, booster_id) DO NOTHING",
        )
        .bind(UserBoosterId::new().into_inner())
        .bind(profile_id.into_inner())
        .bind(booster_id.into_inner())
        .execute(self.pool.pool())
        .await?;

        let row = sqlx::query_as::<_, UserBoosterRow>(
            "SELECT id, game_profile_id, booster_id, level
             FROM user_booster
             WHERE game_profile_id = $1 AND booster_id = $2",
        )
        .bind(profile_id.into_inner())
        .bind(booster_id.into_inner())
        .fetch_optional(self.pool.pool())
        .await?;

        row.map(UserBoosterLevel::try_from)
            .transpose()?
            .ok_or_else(|| DbError::NotFound {
                what: format!("user booster {booster_id} for profile {profile_id}"),
            })
    }

    async fn apply_upgrade(
        &self,
        apply: &UpgradeApply,
    ) -> Result<(GameProfile, UserBoosterLevel), DbError> {
        let expected_level = encode_level(apply.expected_level, "booster level")?;
        let mut tx = self.pool.pool().begin().await?;

        // Debit the profile, conditioned on the version and the balance.
        let profile_row = sqlx::query_as::<_, ProfileRow>(
            "UPDATE game_profile
             SET point_balance = point_balance - $1,
                 version = version + 1
             WHERE id = $2 AND version = $3 AND point_balance >= $1
             RETURNING id, owner, point_balance, total_earned_points, energy_balance,
                       last_energy_updated_at, last_point_updated_at, version, created_at",
        )
        .bind(apply.cost)
        .bind(apply.profile_id.into_inner())
        .bind(apply.expected_version)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(profile_row) = profile_row else {
            tx.rollback().await?;
            return Err(DbError::Conflict {
                entity: "game_profile",
            });
        };

        // Bump the level, conditioned on it being what the caller read.
        let booster_row = sqlx::query_as::<_, UserBoosterRow>(
            "UPDATE user_booster
             SET level = level + 1
             WHERE game_profile_id = $1 AND booster_id = $2 AND level = $3
             RETURNING id, game_profile_id, booster_id, level",
        )
        .bind(apply.profile_id.into_inner())
        .bind(apply.booster_id.into_inner())
        .bind(expected_level)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(booster_row) = booster_row else {
            tx.rollback().await?;
            return Err(DbError::Conflict {
                entity: "user_booster",
            });
        };

        tx.commit().await?;
        Ok((
            GameProfile::from(profile_row),
            UserBoosterLevel::try_from(booster_row)?,
        ))
    }

    async fn daily_boosters(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<DailyBoosterStatus>, DbError> {
        let rows = sqlx::query(
            "SELECT d.id, d.title, d.description, d.booster_type, d.max_available,
                    u.remaining, u.last_refilled_at
             FROM daily_booster d
             LEFT JOIN user_daily_booster u
               ON u.daily_booster_id = d.id AND u.game_profile_id = $1
             ORDER BY d.title",
        )
        .bind(profile_id.into_inner())
        .fetch_all(self.pool.pool())
        .await?;

        rows.into_iter()
            .map(|row| -> Result<DailyBoosterStatus, DbError> {
                let id = DailyBoosterId::from(row.try_get::<Uuid, _>("id")?);
                let definition = DailyBoosterDefinition {
                    id,
                    title: row.try_get("title")?,
                    description: row.try_get("description")?,
                    booster_type: daily_booster_type_from_db(
                        row.try_get::<String, _>("booster_type")?.as_str(),
                    )?,
                    max_available: decode_amount(row.try_get("max_available")?, "max_available")?,
                };
                let remaining: Option<i32> = row.try_get("remaining")?;
                let last_refilled_at: Option<DateTime<Utc>> = row.try_get("last_refilled_at")?;
                let grant = match (remaining, last_refilled_at) {
                    (Some(remaining), Some(last_refilled_at)) => Some(DailyBoosterGrant {
                        profile_id,
                        daily_booster_id: id,
                        remaining: decode_amount(remaining, "remaining")?,
                        last_refilled_at,
                    }),
                    _ => None,
                };
                Ok(DailyBoosterStatus { definition, grant })
            })
            .collect()
    }

    async fn seed_booster(&self, booster: &BoosterDefinition) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO booster (id, title, description, base_price, booster_type)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE
             SET title = EXCLUDED.title,
                 description = EXCLUDED.description,
                 base_price = EXCLUDED.base_price,
                 booster_type = EXCLUDED.booster_type",
        )
        .bind(booster.id.into_inner())
        .bind(&booster.title)
        .bind(&booster.description)
        .bind(booster.base_price)
        .bind(booster_type_to_db(booster.booster_type))
        .execute(self.pool.pool())
        .await?;
        Ok(())
    }

    async fn seed_daily_booster(&self, booster: &DailyBoosterDefinition) -> Result<(), DbError> {
        let max_available = encode_level(booster.max_available, "max_available")?;
        sqlx::query(
            "INSERT INTO daily_booster (id, title, description, booster_type, max_available)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE
             SET title = EXCLUDED.title,
                 description = EXCLUDED.description,
                 booster_type = EXCLUDED.booster_type,
                 max_available = EXCLUDED.max_available",
        )
        .bind(booster.id.into_inner())
        .bind(&booster.title)
        .bind(&booster.description)
        .bind(daily_booster_type_to_db(booster.booster_type))
        .bind(max_available)
        .execute(self.pool.pool())
        .await?;
        Ok(())
    }
}
