//! Exponential cost/benefit curves for booster upgrades.
//!
//! Prices and benefits are computed in `f64` and truncated with `floor`
//! at each step. The exact floating-point-then-floor sequence is part of
//! the product contract: prices are user-facing currency and must come
//! out identical across the client and server implementations.

use crate::config::GameConfig;
use clicker_types::BoosterType;

/// `multiplier^level` in `f64`.
fn growth(multiplier: f64, level: u32) -> f64 {
    multiplier.powi(i32::try_from(level).unwrap_or(i32::MAX))
}

/// Truncate a non-negative curve value to whole currency units.
#[allow(clippy::cast_possible_truncation)]
fn floor_units(value: f64) -> i64 {
    // Curve inputs are non-negative and far below 2^53, so the cast is
    // exact for every reachable value.
    value.floor() as i64
}

/// Price of the upgrade from `level` to `level + 1`.
///
/// `floor(base_price * multiplier^level)`.
#[allow(clippy::cast_precision_loss)]
pub fn upgrade_cost(level: u32, base_price: i64, multiplier: f64) -> i64 {
    floor_units(base_price as f64 * growth(multiplier, level))
}

/// Total benefit held at `level`.
///
/// `sum over i in 0..=level of floor(base_increment * multiplier^i)`.
/// Level 0 already includes the `i = 0` term: every booster grants its
/// base benefit before the first upgrade is bought.
#[allow(clippy::cast_precision_loss)]
pub fn cumulative_increment(level: u32, base_increment: i64, multiplier: f64) -> i64 {
    let mut benefit: i64 = 0;
    for i in 0..=level {
        benefit = benefit.saturating_add(floor_units(base_increment as f64 * growth(multiplier, i)));
    }
    benefit
}

/// Points earned per click at the given multitap level.
///
/// Also the energy consumed per click: one unit of energy per
/// point-equivalent of click power.
pub fn points_per_click(config: &GameConfig, multitap_level: u32) -> i64 {
    cumulative_increment(
        multitap_level,
        config.multitap_base_increment,
        config.multitap_increment_multiplier,
    )
}

/// Energy capacity at the given energy-limit booster level.
pub fn energy_limit(config: &GameConfig, energy_limit_level: u32) -> i64 {
    config.default_energy_limit.saturating_add(cumulative_increment(
        energy_limit_level,
        config.energy_limit_base_increment,
        config.energy_limit_increment_multiplier,
    ))
}

/// The price multiplier for a booster kind.
pub const fn price_multiplier(config: &GameConfig, booster_type: BoosterType) -> f64 {
    match booster_type {
        BoosterType::Multitap => config.multitap_price_multiplier,
        BoosterType::EnergyLimit => config.energy_limit_price_multiplier,
    }
}
