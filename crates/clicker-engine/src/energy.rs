//! Energy regeneration over elapsed wall-clock time.
//!
//! Energy recharges at a fixed rate of one charge per
//! `energy_refill_interval_ms`, expressed as `1000 / interval_ms` charges
//! per second. Only whole elapsed seconds count: sub-second remainders
//! are not credited and are not carried over, so recomputing from the
//! same watermark always yields the same result. Double-crediting cannot
//! occur because the watermark advances on every committed application.

use chrono::{DateTime, Utc};

/// Energy restored between two instants at the configured charge rate.
///
/// `(1000 / interval_ms) * floor(elapsed_ms / 1000)`. Elapsed time is
/// clamped to zero when `now` precedes `last_updated`, keeping the model
/// total over misordered inputs; callers are expected to reject those
/// before crediting anything (the reconciler's stale-timestamp gate does).
#[allow(clippy::cast_precision_loss)]
pub fn restored_energy(last_updated: DateTime<Utc>, now: DateTime<Utc>, interval_ms: u64) -> f64 {
    if interval_ms == 0 {
        return 0.0;
    }
    let elapsed_ms = now
        .signed_duration_since(last_updated)
        .num_milliseconds()
        .max(0);
    let whole_seconds = elapsed_ms.checked_div(1000).unwrap_or(0);
    let charges_per_second = 1000.0 / interval_ms as f64;
    charges_per_second * whole_seconds as f64
}

/// Apply restored energy to a balance, clamped to the capacity.
///
/// `min(balance + restored, cap)`. A balance stranded above the cap
/// (possible only after a capacity-lowering catalog change) is pulled
/// back down to the cap, re-establishing the energy invariant.
pub fn regenerate(balance: f64, restored: f64, cap: f64) -> f64 {
    (balance + restored).min(cap)
}
