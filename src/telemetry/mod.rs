//! Telemetry simulation: one animal, one tick
//!
//! Position advances along the current heading, then the heading drifts;
//! vitals take a bounded random walk and the collar battery drains. The
//! input animal is never touched; a refreshed copy is returned.

pub mod movement;
pub mod vitals;

pub use movement::{advance_position, drift_heading};
pub use vitals::{drain_battery, perturb_vitals};

use rand::Rng;

use crate::core::config::TelemetryConfig;
use crate::core::types::SimTime;
use crate::geofence::FenceSet;
use crate::herd::animal::TrackedAnimal;

/// Advance one animal by `elapsed_seconds` of simulated time
pub fn advance_animal<R: Rng + ?Sized>(
    animal: &TrackedAnimal,
    elapsed_seconds: f64,
    config: &TelemetryConfig,
    fences: &FenceSet,
    now: SimTime,
    rng: &mut R,
) -> TrackedAnimal {
    let mut next = animal.clone();

    next.position = advance_position(animal.position, animal.heading, animal.speed, elapsed_seconds);
    next.heading = drift_heading(animal.heading, config.max_heading_drift_degrees, rng);
    next.vitals = perturb_vitals(&animal.vitals, &config.max_vital_delta, rng);
    next.battery_level = drain_battery(animal.battery_level, config.battery_drain_per_tick);
    next.last_updated = now;

    next.refresh(config, fences);
    next
}
