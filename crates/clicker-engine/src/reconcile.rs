//! The anti-cheat reconciliation of client-reported progress.
//!
//! The client plays optimistically and periodically submits its claimed
//! `(points, energy, timestamp)` snapshot. [`reconcile`] decides whether
//! that claim is physically plausible given the authoritative state and
//! the regeneration model, and if so produces the merged state to commit.
//!
//! Validation runs as sequential gates; the first failing gate rejects
//! the whole submission and authoritative state stays untouched:
//!
//! 1. input sanity (finite, non-negative, representable),
//! 2. timestamp monotonicity (no replays, no rollbacks),
//! 3. energy bound (claimed energy vs. what can have regenerated),
//! 4. points bound (claimed gain vs. what the available energy allows).
//!
//! Energy and points bounds are stretched by the configured tolerance
//! band (default 20%) to absorb network latency and clock skew.

use chrono::{DateTime, TimeZone, Utc};

use clicker_types::{GameProfile, SyncRequest};

use crate::config::GameConfig;
use crate::{curve, energy};

/// Largest point claim accepted from a client.
///
/// Beyond 2^53 a JSON number no longer represents integers exactly, so
/// anything larger is garbage by construction.
const MAX_SAFE_POINTS: f64 = 9_007_199_254_740_992.0;

/// The authoritative state the reconciler validates against.
///
/// A projection of [`GameProfile`] plus the booster levels resolved from
/// the profile's owned-booster rows (level 0 when a row is absent).
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    /// Spendable currency.
    pub point_balance: i64,
    /// Lifetime earned points.
    pub total_earned_points: i64,
    /// Current energy.
    pub energy_balance: f64,
    /// Watermark of the last energy mutation.
    pub last_energy_updated_at: DateTime<Utc>,
    /// Watermark of the last accepted point sync.
    pub last_point_updated_at: DateTime<Utc>,
    /// Multitap booster level.
    pub multitap_level: u32,
    /// Energy-limit booster level.
    pub energy_limit_level: u32,
}

impl ProfileView {
    /// Project a stored profile and its resolved booster levels.
    pub const fn new(profile: &GameProfile, multitap_level: u32, energy_limit_level: u32) -> Self {
        Self {
            point_balance: profile.point_balance,
            total_earned_points: profile.total_earned_points,
            energy_balance: profile.energy_balance,
            last_energy_updated_at: profile.last_energy_updated_at,
            last_point_updated_at: profile.last_point_updated_at,
            multitap_level,
            energy_limit_level,
        }
    }
}

/// The merged state produced by an accepted submission.
///
/// The caller commits all four fields atomically (both watermarks take
/// the claimed timestamp) under optimistic concurrency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedSync {
    /// New spendable balance (the claim, verbatim).
    pub point_balance: i64,
    /// New lifetime counter; never decreases.
    pub total_earned_points: i64,
    /// New energy balance, clamped to the capacity.
    pub energy_balance: f64,
    /// The claimed instant, becoming both watermarks.
    pub updated_at: DateTime<Utc>,
}

/// Why a submission was rejected. Stored state is untouched in every case.
///
/// The numeric fields are surfaced to the client verbatim: they aid
/// debugging and reveal nothing a client could not already infer by
/// probing the bounds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncRejection {
    /// A field was non-numeric, negative, or out of representable range.
    #[error("invalid input: {detail}")]
    InvalidInput {
        /// Which field failed and how.
        detail: String,
    },

    /// The submission is older than the last accepted one.
    #[error("stale timestamp: submitted {submitted_ms} is older than last accepted {last_accepted_ms}")]
    StaleTimestamp {
        /// Claimed client clock, epoch milliseconds.
        submitted_ms: i64,
        /// The stored point watermark, epoch milliseconds.
        last_accepted_ms: i64,
    },

    /// Claimed energy exceeds what can have regenerated.
    #[error("invalid energy balance: claimed {claimed}, expected at most {expected}")]
    EnergyOverrun {
        /// The client's claimed energy.
        claimed: f64,
        /// The server-computed upper bound (before tolerance).
        expected: f64,
    },

    /// Claimed point gain exceeds what the available energy allows.
    #[error(
        "invalid points claim: unsynced points {unsynced_points}, max possible {max_possible_points}"
    )]
    PointsOverrun {
        /// Claimed balance minus stored balance.
        unsynced_points: i64,
        /// The server-computed bound (tolerance included).
        max_possible_points: f64,
    },
}

/// Validate a client snapshot against authoritative state.
///
/// Pure: reads only its arguments, commits nothing. On success the
/// returned [`AcceptedSync`] is what the caller must persist; on failure
/// the profile must be left exactly as it was.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn reconcile(
    profile: &ProfileView,
    report: &SyncRequest,
    config: &GameConfig,
) -> Result<AcceptedSync, SyncRejection> {
    // Gate 1: input sanity. The upstream implementation parsed these
    // checks but dropped the result on the floor; here a bad field is a
    // first-class rejection.
    if !report.points.is_finite() || report.points < 0.0 || report.points > MAX_SAFE_POINTS {
        return Err(SyncRejection::InvalidInput {
            detail: format!("points must be a non-negative number, got {}", report.points),
        });
    }
    if !report.current_energy.is_finite() || report.current_energy < 0.0 {
        return Err(SyncRejection::InvalidInput {
            detail: format!(
                "currentEnergy must be a non-negative number, got {}",
                report.current_energy
            ),
        });
    }
    let submitted_at = match Utc.timestamp_millis_opt(report.timestamp).single() {
        Some(at) if report.timestamp > 0 => at,
        _ => {
            return Err(SyncRejection::InvalidInput {
                detail: format!("timestamp must be positive epoch milliseconds, got {}", report.timestamp),
            });
        }
    };

    // Gate 2: timestamp monotonicity. Replayed or reordered submissions
    // must never roll state backward.
    let last_accepted_ms = profile.last_point_updated_at.timestamp_millis();
    if report.timestamp < last_accepted_ms {
        return Err(SyncRejection::StaleTimestamp {
            submitted_ms: report.timestamp,
            last_accepted_ms,
        });
    }

    // Gate 3: energy bound. The most the client can hold now is what it
    // had, plus what regenerated since, clamped to the capacity.
    let cap = curve::energy_limit(config, profile.energy_limit_level) as f64;
    let restored = energy::restored_energy(
        profile.last_energy_updated_at,
        submitted_at,
        config.energy_refill_interval_ms,
    );
    let expected_energy = energy::regenerate(profile.energy_balance, restored, cap);
    if report.current_energy > expected_energy * config.sync_tolerance {
        return Err(SyncRejection::EnergyOverrun {
            claimed: report.current_energy,
            expected: expected_energy,
        });
    }

    // Gate 4: points bound. Every click spends pointsPerClick energy and
    // earns pointsPerClick points, so the claimable gain is capped by the
    // clicks the expected energy could have funded.
    let points_per_click = curve::points_per_click(config, profile.multitap_level) as f64;
    let max_possible_clicks = (expected_energy / points_per_click).floor();
    let max_possible_points = max_possible_clicks * points_per_click * config.sync_tolerance;

    // Bounded by MAX_SAFE_POINTS above, so the truncating cast is exact.
    let claimed_points = report.points.trunc() as i64;
    let unsynced_points = claimed_points.saturating_sub(profile.point_balance);
    if unsynced_points as f64 > max_possible_points {
        return Err(SyncRejection::PointsOverrun {
            unsynced_points,
            max_possible_points,
        });
    }

    // Accepted: merge. The lifetime counter only ever moves forward --
    // a client reporting fewer points than stored lowers the spendable
    // balance (legitimate spending) but never the tier progress.
    let earned_delta = unsynced_points.max(0);
    Ok(AcceptedSync {
        point_balance: claimed_points,
        total_earned_points: profile.total_earned_points.saturating_add(earned_delta),
        energy_balance: report.current_energy.min(cap),
        updated_at: submitted_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A config with flat, easy-to-reason-about curves: 5 points per
    /// click at level 0, a 100-energy cap, 1 charge per second.
    fn test_config() -> GameConfig {
        GameConfig {
            multitap_base_increment: 5,
            multitap_increment_multiplier: 1.05,
            energy_limit_base_increment: 0,
            default_energy_limit: 100,
            energy_refill_interval_ms: 1000,
            ..GameConfig::default()
        }
    }

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
    }

    fn profile_at(ms: i64) -> ProfileView {
        ProfileView {
            point_balance: 0,
            total_earned_points: 0,
            energy_balance: 100.0,
            last_energy_updated_at: at_ms(ms),
            last_point_updated_at: at_ms(ms),
            multitap_level: 0,
            energy_limit_level: 0,
        }
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let profile = ProfileView {
            point_balance: 100,
            ..profile_at(1000)
        };
        let report = SyncRequest {
            points: 100.0,
            current_energy: 0.0,
            timestamp: 999,
        };
        assert_eq!(
            reconcile(&profile, &report, &test_config()),
            Err(SyncRejection::StaleTimestamp {
                submitted_ms: 999,
                last_accepted_ms: 1000,
            })
        );
    }

    #[test]
    fn equal_timestamp_is_accepted() {
        let profile = profile_at(1000);
        let report = SyncRequest {
            points: 0.0,
            current_energy: 50.0,
            timestamp: 1000,
        };
        assert!(reconcile(&profile, &report, &test_config()).is_ok());
    }

    #[test]
    fn points_overrun_boundary() {
        // expectedEnergy = 100, pointsPerClick = 5:
        // maxPossibleClicks = 20, maxPossiblePoints = 20 * 5 * 1.2 = 120.
        let profile = profile_at(0);
        let config = test_config();

        let over = SyncRequest {
            points: 121.0,
            current_energy: 0.0,
            timestamp: 1,
        };
        assert!(matches!(
            reconcile(&profile, &over, &config),
            Err(SyncRejection::PointsOverrun {
                unsynced_points: 121,
                ..
            })
        ));

        let at_bound = SyncRequest {
            points: 120.0,
            current_energy: 0.0,
            timestamp: 1,
        };
        assert!(reconcile(&profile, &at_bound, &config).is_ok());
    }

    #[test]
    fn energy_overrun_is_rejected_with_bounds() {
        // 50 seconds of regeneration from empty: expected 50, tolerance
        // allows up to 60.
        let profile = ProfileView {
            energy_balance: 0.0,
            ..profile_at(0)
        };
        let config = test_config();

        let over = SyncRequest {
            points: 0.0,
            current_energy: 61.0,
            timestamp: 50_000,
        };
        match reconcile(&profile, &over, &config) {
            Err(SyncRejection::EnergyOverrun { claimed, expected }) => {
                assert!((claimed - 61.0).abs() < f64::EPSILON);
                assert!((expected - 50.0).abs() < f64::EPSILON);
            }
            other => assert!(false, "expected EnergyOverrun, got {other:?}"),
        }

        let within = SyncRequest {
            points: 0.0,
            current_energy: 60.0,
            timestamp: 50_000,
        };
        assert!(reconcile(&profile, &within, &config).is_ok());
    }

    #[test]
    fn spending_energy_is_always_legitimate() {
        let profile = profile_at(0);
        let report = SyncRequest {
            points: 50.0,
            current_energy: 0.0,
            timestamp: 1,
        };
        let accepted = reconcile(&profile, &report, &test_config()).unwrap_or(AcceptedSync {
            point_balance: -1,
            total_earned_points: -1,
            energy_balance: -1.0,
            updated_at: at_ms(0),
        });
        assert_eq!(accepted.point_balance, 50);
        assert!((accepted.energy_balance).abs() < f64::EPSILON);
    }

    #[test]
    fn accepted_energy_is_clamped_to_capacity() {
        // Claims inside the tolerance band may exceed the cap; the
        // committed balance must not.
        let profile = profile_at(0);
        let report = SyncRequest {
            points: 0.0,
            current_energy: 110.0,
            timestamp: 1,
        };
        let accepted = reconcile(&profile, &report, &test_config());
        match accepted {
            Ok(sync) => assert!((sync.energy_balance - 100.0).abs() < f64::EPSILON),
            Err(rejection) => assert!(false, "expected acceptance, got {rejection}"),
        }
    }

    #[test]
    fn negative_delta_lowers_balance_but_not_lifetime_counter() {
        let profile = ProfileView {
            point_balance: 500,
            total_earned_points: 800,
            ..profile_at(0)
        };
        let report = SyncRequest {
            points: 300.0,
            current_energy: 10.0,
            timestamp: 1,
        };
        match reconcile(&profile, &report, &test_config()) {
            Ok(sync) => {
                assert_eq!(sync.point_balance, 300);
                assert_eq!(sync.total_earned_points, 800);
            }
            Err(rejection) => assert!(false, "expected acceptance, got {rejection}"),
        }
    }

    #[test]
    fn positive_delta_raises_lifetime_counter() {
        let profile = ProfileView {
            point_balance: 100,
            total_earned_points: 100,
            ..profile_at(0)
        };
        let report = SyncRequest {
            points: 150.0,
            current_energy: 40.0,
            timestamp: 1,
        };
        match reconcile(&profile, &report, &test_config()) {
            Ok(sync) => {
                assert_eq!(sync.point_balance, 150);
                assert_eq!(sync.total_earned_points, 150);
            }
            Err(rejection) => assert!(false, "expected acceptance, got {rejection}"),
        }
    }

    #[test]
    fn watermarks_take_the_claimed_instant() {
        let profile = profile_at(0);
        let report = SyncRequest {
            points: 0.0,
            current_energy: 90.0,
            timestamp: 42_000,
        };
        match reconcile(&profile, &report, &test_config()) {
            Ok(sync) => assert_eq!(sync.updated_at, at_ms(42_000)),
            Err(rejection) => assert!(false, "expected acceptance, got {rejection}"),
        }
    }

    #[test]
    fn non_finite_and_negative_inputs_are_invalid() {
        let profile = profile_at(0);
        let config = test_config();
        let reports = [
            SyncRequest {
                points: f64::NAN,
                current_energy: 0.0,
                timestamp: 1,
            },
            SyncRequest {
                points: -1.0,
                current_energy: 0.0,
                timestamp: 1,
            },
            SyncRequest {
                points: 0.0,
                current_energy: f64::INFINITY,
                timestamp: 1,
            },
            SyncRequest {
                points: 0.0,
                current_energy: -0.5,
                timestamp: 1,
            },
            SyncRequest {
                points: 0.0,
                current_energy: 0.0,
                timestamp: 0,
            },
        ];
        for report in reports {
            assert!(matches!(
                reconcile(&profile, &report, &config),
                Err(SyncRejection::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn regenerated_energy_funds_the_points_bound() {
        // From empty energy, 50s of regen at 1/s: expected 50, so at
        // 5 points per click up to floor(50/5)*5*1.2 = 60 new points.
        let profile = ProfileView {
            energy_balance: 0.0,
            ..profile_at(0)
        };
        let config = test_config();
        let ok = SyncRequest {
            points: 60.0,
            current_energy: 0.0,
            timestamp: 50_000,
        };
        assert!(reconcile(&profile, &ok, &config).is_ok());

        let over = SyncRequest {
            points: 61.0,
            current_energy: 0.0,
            timestamp: 50_000,
        };
        assert!(matches!(
            reconcile(&profile, &over, &config),
            Err(SyncRejection::PointsOverrun { .. })
        ));
    }
}
