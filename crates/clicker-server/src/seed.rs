//! Default catalog seeding.
//!
//! The booster and daily-booster catalogs are data, not schema, so they
//! are written by the server at startup rather than by a migration. The
//! entries carry fixed identifiers, making the seeding idempotent across
//! restarts and environments.

use uuid::Uuid;

use clicker_db::{DbError, GameStore};
use clicker_types::{
    BoosterDefinition, BoosterId, BoosterType, DailyBoosterDefinition, DailyBoosterId,
    DailyBoosterType,
};

/// Fixed identifier of the multitap booster.
const MULTITAP_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

/// Fixed identifier of the energy-limit booster.
const ENERGY_LIMIT_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);

/// Fixed identifier of the daily energy refill.
const DAILY_REFILL_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0003);

/// Upsert the default catalogs.
///
/// # Errors
///
/// Returns [`DbError`] if any catalog write fails.
pub async fn seed_catalog(store: &dyn GameStore) -> Result<(), DbError> {
    store
        .seed_booster(&BoosterDefinition {
            id: BoosterId::from(MULTITAP_ID),
            title: String::from("Multitap"),
            description: String::from("Earn more points with every tap."),
            base_price: 1000,
            booster_type: BoosterType::Multitap,
        })
        .await?;

    store
        .seed_booster(&BoosterDefinition {
            id: BoosterId::from(ENERGY_LIMIT_ID),
            title: String::from("Energy limit"),
            description: String::from("Raise the energy cap for longer tap sessions."),
            base_price: 1500,
            booster_type: BoosterType::EnergyLimit,
        })
        .await?;

    store
        .seed_daily_booster(&DailyBoosterDefinition {
            id: DailyBoosterId::from(DAILY_REFILL_ID),
            title: String::from("Full energy"),
            description: String::from("Instantly refill the energy bar."),
            booster_type: DailyBoosterType::DailyRefill,
            max_available: 6,
        })
        .await?;

    tracing::info!("catalog seeded");
    Ok(())
}
