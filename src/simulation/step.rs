//! The pure state transition
//!
//! Telemetry first, then the derived statuses, then the alert ledger. The
//! input state is never modified: a failed step leaves the caller holding
//! the last good state.

use ahash::AHashSet;
use rand::Rng;

use crate::alerts::{AlertEvent, AlertKind, AlertLedger, Observation};
use crate::core::config::TelemetryConfig;
use crate::core::error::{HerdError, Result};
use crate::core::types::SimTime;
use crate::geofence::FenceSet;
use crate::health::describe;
use crate::herd::animal::TrackedAnimal;
use crate::telemetry::advance_animal;

/// Everything that changes from tick to tick
#[derive(Debug, Clone, Default)]
pub struct HerdState {
    pub clock: SimTime,
    pub animals: Vec<TrackedAnimal>,
    pub ledger: AlertLedger,
}

impl HerdState {
    pub fn new(clock: SimTime, animals: Vec<TrackedAnimal>, ledger: AlertLedger) -> Self {
        Self { clock, animals, ledger }
    }
}

/// Result of one step: the next state and the notifications it produced
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub state: HerdState,
    pub events: Vec<AlertEvent>,
}

/// Advance every animal by `elapsed_seconds` and reconcile alert episodes
pub fn step<R: Rng + ?Sized>(
    state: &HerdState,
    elapsed_seconds: f64,
    config: &TelemetryConfig,
    fences: &FenceSet,
    rng: &mut R,
) -> Result<StepOutcome> {
    if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
        return Err(HerdError::invalid(format!(
            "elapsed time must be positive, got {}",
            elapsed_seconds
        )));
    }

    let now = state.clock.advanced(elapsed_seconds);
    let animals: Vec<TrackedAnimal> = state
        .animals
        .iter()
        .map(|animal| advance_animal(animal, elapsed_seconds, config, fences, now, rng))
        .collect();

    check_population(&state.animals, &animals)?;

    let mut ledger = state.ledger.clone();
    let mut events = Vec::new();
    for (before, after) in state.animals.iter().zip(&animals) {
        record_transitions(&mut ledger, Some(before), after, config, now, rng, &mut events)?;
    }
    ledger.check_invariants()?;

    tracing::debug!(
        tick = now.tick,
        animals = animals.len(),
        events = events.len(),
        open = ledger.open_count(),
        "step complete"
    );

    Ok(StepOutcome {
        state: HerdState::new(now, animals, ledger),
        events,
    })
}

/// Feed one animal's health and boundary transitions into the ledger
///
/// `previous` of `None` stands for the Clear initial state of a freshly
/// generated animal.
pub(crate) fn record_transitions<R: Rng + ?Sized>(
    ledger: &mut AlertLedger,
    previous: Option<&TrackedAnimal>,
    current: &TrackedAnimal,
    config: &TelemetryConfig,
    now: SimTime,
    rng: &mut R,
    events: &mut Vec<AlertEvent>,
) -> Result<()> {
    let was_unhealthy = previous.map_or(false, |p| p.health_status().is_violating());
    let was_outside = previous.map_or(false, |p| p.boundary_status().is_violating());

    let health = Observation {
        subject: current.id.clone(),
        kind: AlertKind::Health,
        was_violating: was_unhealthy,
        is_violating: current.health_status().is_violating(),
        detail: health_detail(current, config),
    };
    let boundary = Observation {
        subject: current.id.clone(),
        kind: AlertKind::GeoFence,
        was_violating: was_outside,
        is_violating: current.boundary_status().is_violating(),
        detail: format!(
            "outside all fences at ({:.5}, {:.5})",
            current.position.lat, current.position.lng
        ),
    };

    for observation in [health, boundary] {
        if let Some(event) = ledger.observe(observation, now, rng)? {
            events.push(event);
        }
    }
    Ok(())
}

fn health_detail(animal: &TrackedAnimal, config: &TelemetryConfig) -> String {
    let thresholds = &config.profile(animal.category).thresholds;
    let detail = describe(&animal.vitals, thresholds, animal.health_status());
    if detail.is_empty() {
        "unreadable vitals".to_string()
    } else {
        detail
    }
}

/// Same animals, same order, no duplicate ids
fn check_population(before: &[TrackedAnimal], after: &[TrackedAnimal]) -> Result<()> {
    if before.len() != after.len() {
        return Err(HerdError::inconsistent(format!(
            "population changed from {} to {} during a step",
            before.len(),
            after.len()
        )));
    }
    if let Some((b, a)) = before.iter().zip(after).find(|(b, a)| b.id != a.id) {
        return Err(HerdError::inconsistent(format!(
            "animal {} replaced by {} during a step",
            b.id, a.id
        )));
    }
    ensure_unique_ids(after)
}

pub(crate) fn ensure_unique_ids(animals: &[TrackedAnimal]) -> Result<()> {
    let mut seen = AHashSet::with_capacity(animals.len());
    for animal in animals {
        if !seen.insert(&animal.id) {
            return Err(HerdError::inconsistent(format!("duplicate animal id {}", animal.id)));
        }
    }
    Ok(())
}
