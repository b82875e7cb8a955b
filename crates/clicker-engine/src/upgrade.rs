//! Pricing and validation of booster upgrades.
//!
//! The quote is pure arithmetic; the atomic check-and-apply lives in the
//! persistence layer, conditioned on the profile version and the booster
//! level both being unchanged since they were read.

use clicker_types::BoosterDefinition;

use crate::config::GameConfig;
use crate::curve;

/// A priced upgrade, ready to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeQuote {
    /// The level the upgrade starts from.
    pub current_level: u32,
    /// The level the upgrade produces.
    pub new_level: u32,
    /// Points charged for this upgrade.
    pub cost: i64,
    /// The balance left after paying `cost`.
    pub remaining_balance: i64,
    /// Price of the following upgrade, for display.
    pub next_price: i64,
}

/// Why an upgrade cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UpgradeError {
    /// The account cannot afford the upgrade.
    #[error("not enough points: required {required}, balance {balance}")]
    InsufficientPoints {
        /// The price of the upgrade.
        required: i64,
        /// The account's spendable balance.
        balance: i64,
    },
}

/// Price the upgrade from `current_level` and check it against the
/// account's balance.
///
/// The price multiplier is selected by the booster's kind; the cost and
/// the next level's display price both come off the same exponential
/// curve.
///
/// # Errors
///
/// Returns [`UpgradeError::InsufficientPoints`] when `point_balance`
/// does not cover the cost.
pub fn quote_upgrade(
    booster: &BoosterDefinition,
    current_level: u32,
    point_balance: i64,
    config: &GameConfig,
) -> Result<UpgradeQuote, UpgradeError> {
    let multiplier = curve::price_multiplier(config, booster.booster_type);
    let cost = curve::upgrade_cost(current_level, booster.base_price, multiplier);
    let Some(remaining_balance) = point_balance.checked_sub(cost) else {
        return Err(UpgradeError::InsufficientPoints {
            required: cost,
            balance: point_balance,
        });
    };
    if remaining_balance < 0 {
        return Err(UpgradeError::InsufficientPoints {
            required: cost,
            balance: point_balance,
        });
    }
    let new_level = current_level.saturating_add(1);
    Ok(UpgradeQuote {
        current_level,
        new_level,
        cost,
        remaining_balance,
        next_price: curve::upgrade_cost(new_level, booster.base_price, multiplier),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_types::{BoosterId, BoosterType};

    fn multitap(base_price: i64) -> BoosterDefinition {
        BoosterDefinition {
            id: BoosterId::new(),
            title: String::from("Multitap"),
            description: String::from("Earn more points per tap."),
            base_price,
            booster_type: BoosterType::Multitap,
        }
    }

    #[test]
    fn first_upgrade_costs_base_price() {
        let config = GameConfig::default();
        let quote = quote_upgrade(&multitap(1000), 0, 1000, &config);
        match quote {
            Ok(quote) => {
                assert_eq!(quote.cost, 1000);
                assert_eq!(quote.new_level, 1);
                assert_eq!(quote.remaining_balance, 0);
            }
            Err(error) => assert!(false, "expected a quote, got {error}"),
        }
    }

    #[test]
    fn exact_balance_is_sufficient() {
        let config = GameConfig::default();
        assert!(quote_upgrade(&multitap(1000), 0, 1000, &config).is_ok());
    }

    #[test]
    fn one_point_short_is_insufficient() {
        let config = GameConfig::default();
        assert_eq!(
            quote_upgrade(&multitap(1000), 0, 999, &config),
            Err(UpgradeError::InsufficientPoints {
                required: 1000,
                balance: 999,
            })
        );
    }

    #[test]
    fn next_price_follows_the_curve() {
        let config = GameConfig::default();
        let quote = quote_upgrade(&multitap(1000), 2, 10_000_000, &config);
        match quote {
            Ok(quote) => {
                // 1000 * 1.5^2 = 2250, next 1000 * 1.5^3 = 3375.
                assert_eq!(quote.cost, 2250);
                assert_eq!(quote.next_price, 3375);
            }
            Err(error) => assert!(false, "expected a quote, got {error}"),
        }
    }

    #[test]
    fn energy_limit_uses_its_own_multiplier() {
        let config = GameConfig {
            multitap_price_multiplier: 2.0,
            energy_limit_price_multiplier: 1.1,
            ..GameConfig::default()
        };
        let booster = BoosterDefinition {
            booster_type: BoosterType::EnergyLimit,
            ..multitap(1000)
        };
        match quote_upgrade(&booster, 1, 10_000, &config) {
            Ok(quote) => assert_eq!(quote.cost, 1100),
            Err(error) => assert!(false, "expected a quote, got {error}"),
        }
    }
}
