//! Assembly of the [`GameContext`] DTO from storage records.
//!
//! Absent relation rows become explicit defaults here: a booster with no
//! owned row is level 0, a daily refill with no grant row means zero
//! refills available and a reset instant of "now".

use chrono::{DateTime, Utc};

use clicker_engine::config::GameConfig;
use clicker_engine::curve;
use clicker_engine::levels::LevelProgressionTable;
use clicker_types::{
    BoosterType, DailyBoosterStatus, DailyBoosterType, GameContext, GameProfile, OwnedBoosterLevel,
};

/// The booster levels a profile holds, with absent rows resolved to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoosterLevels {
    /// Multitap booster level.
    pub multitap: u32,
    /// Energy-limit booster level.
    pub energy_limit: u32,
}

/// Resolve the two engine-relevant booster levels from owned rows.
pub fn booster_levels(owned: &[OwnedBoosterLevel]) -> BoosterLevels {
    let mut levels = BoosterLevels::default();
    for owned_level in owned {
        match owned_level.booster.booster_type {
            BoosterType::Multitap => levels.multitap = owned_level.level,
            BoosterType::EnergyLimit => levels.energy_limit = owned_level.level,
        }
    }
    levels
}

/// The energy capacity as the `f64` the regeneration model works in.
#[allow(clippy::cast_precision_loss)]
pub fn energy_cap(config: &GameConfig, energy_limit_level: u32) -> f64 {
    curve::energy_limit(config, energy_limit_level) as f64
}

/// Build the full context DTO for a profile.
///
/// `now` supplies the fallback reset instant when no daily-refill grant
/// row exists yet.
pub fn build_game_context(
    profile: &GameProfile,
    owned: &[OwnedBoosterLevel],
    daily: &[DailyBoosterStatus],
    config: &GameConfig,
    levels: &LevelProgressionTable,
    now: DateTime<Utc>,
) -> GameContext {
    let booster = booster_levels(owned);

    let mut remaining_energy_refills = 0;
    let mut last_energy_refilled_at = now;
    let mut max_energy_refills_per_day = config.max_energy_refills_per_day;
    if let Some(refill) = daily
        .iter()
        .find(|status| status.definition.booster_type == DailyBoosterType::DailyRefill)
    {
        max_energy_refills_per_day = refill.definition.max_available;
        if let Some(grant) = &refill.grant {
            remaining_energy_refills = grant.remaining;
            last_energy_refilled_at = grant.last_refilled_at;
        }
    }

    let point_earns_per_click = curve::points_per_click(config, booster.multitap);
    GameContext {
        level_name: levels.tier_for(profile.total_earned_points).name.clone(),
        energy_limit: curve::energy_limit(config, booster.energy_limit),
        remaining_energy_refills,
        total_earned_points: profile.total_earned_points,
        point_balance: profile.point_balance,
        energy_balance: profile.energy_balance,
        multitap_level: booster.multitap,
        energy_limit_level: booster.energy_limit,
        last_energy_refilled_at,
        last_energy_updated_at: profile.last_energy_updated_at,
        last_point_updated_at: profile.last_point_updated_at,
        max_energy_refills_per_day,
        point_earns_per_click,
        // One unit of energy per point-equivalent of click power.
        energy_consumes_per_click: point_earns_per_click,
        energy_refill_interval: config.energy_refill_interval_ms,
    }
}
