//! Tier progression table mapping lifetime earned points to named tiers.
//!
//! Tiers are ordered by ascending `min_points` with the first tier always
//! at threshold 0, so every non-negative point total maps to exactly one
//! tier. Lookup scans from the highest tier downward and stops at the
//! first threshold at or below the input.

use serde::{Deserialize, Serialize};

/// One tier of the progression ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTier {
    /// Display name shown to the player.
    pub name: String,
    /// Minimum lifetime earned points required to hold this tier.
    pub min_points: i64,
    /// Referral reward paid when an invited friend reaches this tier.
    pub friend_bonus: i64,
    /// Referral reward for premium-account friends.
    pub friend_bonus_premium: i64,
}

/// Errors raised by [`LevelProgressionTable::new`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelTableError {
    /// The table must contain at least one tier.
    #[error("level table must not be empty")]
    Empty,

    /// The first tier must start at zero so every total maps to a tier.
    #[error("first tier must have min_points 0, got {0}")]
    NonZeroFirstTier(i64),

    /// Thresholds must be strictly ascending.
    #[error("tier thresholds must be strictly ascending at index {index}")]
    NonAscending {
        /// Index of the offending tier.
        index: usize,
    },
}

/// Ordered tier ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelProgressionTable {
    tiers: Vec<LevelTier>,
}

impl LevelProgressionTable {
    /// Build a table from an ordered tier list.
    ///
    /// # Errors
    ///
    /// Returns [`LevelTableError`] if the list is empty, does not start
    /// at threshold 0, or is not strictly ascending.
    pub fn new(tiers: Vec<LevelTier>) -> Result<Self, LevelTableError> {
        let Some(first) = tiers.first() else {
            return Err(LevelTableError::Empty);
        };
        if first.min_points != 0 {
            return Err(LevelTableError::NonZeroFirstTier(first.min_points));
        }
        for (index, pair) in tiers.windows(2).enumerate() {
            if let [prev, next] = pair
                && next.min_points <= prev.min_points
            {
                return Err(LevelTableError::NonAscending {
                    index: index.saturating_add(1),
                });
            }
        }
        Ok(Self { tiers })
    }

    /// The tier held at the given lifetime earned points.
    ///
    /// Scans from the highest tier downward and returns the first tier
    /// whose threshold is at or below the input. Falls back to the first
    /// tier; with a validated table the fallback is unreachable for
    /// non-negative input, but the function stays total over all of `i64`.
    pub fn tier_for(&self, total_earned_points: i64) -> &LevelTier {
        self.tiers
            .iter()
            .rev()
            .find(|tier| total_earned_points >= tier.min_points)
            .or_else(|| self.tiers.first())
            .unwrap_or(&FALLBACK_TIER)
    }

    /// All tiers, lowest first.
    pub fn tiers(&self) -> &[LevelTier] {
        &self.tiers
    }
}

/// Static fallback for the (construction-excluded) empty-table case.
static FALLBACK_TIER: LevelTier = LevelTier {
    name: String::new(),
    min_points: 0,
    friend_bonus: 0,
    friend_bonus_premium: 0,
};

impl Default for LevelProgressionTable {
    /// The shipped tier ladder.
    fn default() -> Self {
        Self {
            tiers: vec![
                LevelTier {
                    name: String::from("\u{1f949} Bronze"),
                    min_points: 0,
                    friend_bonus: 0,
                    friend_bonus_premium: 0,
                },
                LevelTier {
                    name: String::from("\u{1f948} Silver"),
                    min_points: 5_000,
                    friend_bonus: 10_000,
                    friend_bonus_premium: 20_000,
                },
                LevelTier {
                    name: String::from("\u{1f947} Gold"),
                    min_points: 25_000,
                    friend_bonus: 30_000,
                    friend_bonus_premium: 50_000,
                },
                LevelTier {
                    name: String::from("\u{1f3c6} Platinum"),
                    min_points: 1_000_000,
                    friend_bonus: 60_000,
                    friend_bonus_premium: 100_000,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_points_is_bronze() {
        let table = LevelProgressionTable::default();
        assert_eq!(table.tier_for(0).name, "\u{1f949} Bronze");
    }

    #[test]
    fn threshold_is_inclusive() {
        let table = LevelProgressionTable::default();
        assert_eq!(table.tier_for(4_999).name, "\u{1f949} Bronze");
        assert_eq!(table.tier_for(5_000).name, "\u{1f948} Silver");
        assert_eq!(table.tier_for(25_000).name, "\u{1f947} Gold");
    }

    #[test]
    fn top_tier_is_open_ended() {
        let table = LevelProgressionTable::default();
        assert_eq!(table.tier_for(i64::MAX).name, "\u{1f3c6} Platinum");
    }

    #[test]
    fn negative_input_falls_back_to_first_tier() {
        // Defensive behavior only: totals are non-negative by invariant.
        let table = LevelProgressionTable::default();
        assert_eq!(table.tier_for(-1).name, "\u{1f949} Bronze");
    }

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(
            LevelProgressionTable::new(Vec::new()),
            Err(LevelTableError::Empty)
        );
    }

    #[test]
    fn nonzero_first_tier_is_rejected() {
        let tiers = vec![LevelTier {
            name: String::from("Late start"),
            min_points: 10,
            friend_bonus: 0,
            friend_bonus_premium: 0,
        }];
        assert_eq!(
            LevelProgressionTable::new(tiers),
            Err(LevelTableError::NonZeroFirstTier(10))
        );
    }

    #[test]
    fn descending_thresholds_are_rejected() {
        let tiers = vec![
            LevelTier {
                name: String::from("A"),
                min_points: 0,
                friend_bonus: 0,
                friend_bonus_premium: 0,
            },
            LevelTier {
                name: String::from("B"),
                min_points: 100,
                friend_bonus: 0,
                friend_bonus_premium: 0,
            },
            LevelTier {
                name: String::from("C"),
                min_points: 100,
                friend_bonus: 0,
                friend_bonus_premium: 0,
            },
        ];
        assert_eq!(
            LevelProgressionTable::new(tiers),
            Err(LevelTableError::NonAscending { index: 2 })
        );
    }
}
