//! Bounded random walk for collar vitals

use rand::Rng;

use crate::core::config::VitalDeltas;
use crate::herd::animal::Vitals;

fn jitter<R: Rng + ?Sized>(max: f64, rng: &mut R) -> f64 {
    if max > 0.0 {
        rng.gen_range(-max..=max)
    } else {
        0.0
    }
}

/// Perturb each vital around its previous value
///
/// No metric moves by more than its configured delta. Indices are kept in
/// 0-100 and rates non-negative; clamping only ever shortens a step.
pub fn perturb_vitals<R: Rng + ?Sized>(vitals: &Vitals, deltas: &VitalDeltas, rng: &mut R) -> Vitals {
    Vitals {
        temperature: vitals.temperature + jitter(deltas.temperature, rng),
        heart_rate: (vitals.heart_rate + jitter(deltas.heart_rate, rng)).max(0.0),
        activity: (vitals.activity + jitter(deltas.activity, rng)).clamp(0.0, 100.0),
        stress: (vitals.stress + jitter(deltas.stress, rng)).clamp(0.0, 100.0),
    }
}

/// Battery after one tick of drain, never below zero
pub fn drain_battery(level: f64, drain_per_tick: f64) -> f64 {
    (level - drain_per_tick).max(0.0)
}
