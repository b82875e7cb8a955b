//! Enumeration types shared between the storage records and the wire DTOs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Booster kinds
// ---------------------------------------------------------------------------

/// Kind of a purchasable booster.
///
/// The kind selects which upgrade curve parameters apply when pricing the
/// next level and which derived quantity the cumulative benefit feeds:
/// points-per-click for `Multitap`, the energy capacity for `EnergyLimit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum BoosterType {
    /// Increases points earned (and energy consumed) per click.
    Multitap,
    /// Increases the energy capacity.
    EnergyLimit,
}

/// Kind of a daily (capped-use) booster.
///
/// Daily boosters are consumables replenished by an external scheduler;
/// the engine only reads their remaining amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum DailyBoosterType {
    /// Instantly refills the energy balance to the cap.
    DailyRefill,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booster_type_wire_format() {
        let json = serde_json::to_string(&BoosterType::EnergyLimit).unwrap_or_default();
        assert_eq!(json, "\"ENERGY_LIMIT\"");
        let json = serde_json::to_string(&BoosterType::Multitap).unwrap_or_default();
        assert_eq!(json, "\"MULTITAP\"");
    }

    #[test]
    fn daily_booster_type_wire_format() {
        let json = serde_json::to_string(&DailyBoosterType::DailyRefill).unwrap_or_default();
        assert_eq!(json, "\"DAILY_REFILL\"");
    }
}
