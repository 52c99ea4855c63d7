//! Stateful driver around [`step`]
//!
//! `Simulation` owns the configuration, fences, seeded RNG and id allocator.
//! Every mutating operation works on copies and commits only on success.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::alerts::{AlertEpisode, AlertEvent, AlertKind, AlertLedger};
use crate::core::config::TelemetryConfig;
use crate::core::error::{HerdError, Result};
use crate::core::types::{AnimalId, SimTime};
use crate::geofence::FenceSet;
use crate::herd::animal::TrackedAnimal;
use crate::herd::generation::{generate_herd, HerdCounts, IdAllocator};
use crate::persistence::HerdSnapshot;
use crate::simulation::step::{ensure_unique_ids, record_transitions, step, HerdState};

#[derive(Debug, Clone)]
pub struct Simulation {
    config: TelemetryConfig,
    fences: FenceSet,
    seed: u64,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    state: HerdState,
}

impl Simulation {
    /// Empty simulation using the fences named in `config` (or the default farm)
    pub fn new(config: TelemetryConfig, seed: u64) -> Result<Self> {
        let fences = FenceSet::from_config(config.fences.as_deref())?;
        Self::with_fences(config, fences, seed)
    }

    pub fn with_fences(config: TelemetryConfig, fences: FenceSet, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fences,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            ids: IdAllocator::new(),
            state: HerdState::default(),
        })
    }

    /// Replace the population with a freshly generated one
    ///
    /// Episodes still open for the outgoing animals are closed without
    /// notification. New animals start from the Clear state, so any born in
    /// violation open an episode straight away; those events are returned.
    pub fn reset(&mut self, counts: &HerdCounts) -> Result<Vec<AlertEvent>> {
        let now = self.state.clock;
        let mut rng = self.rng.clone();
        let mut ids = self.ids.clone();

        let animals = generate_herd(counts, &self.config, &self.fences, &mut ids, now, &mut rng)?;

        let mut ledger = self.state.ledger.clone();
        let retired = ledger.close_all(now);
        let mut events = Vec::new();
        for animal in &animals {
            record_transitions(&mut ledger, None, animal, &self.config, now, &mut rng, &mut events)?;
        }

        tracing::info!(
            animals = animals.len(),
            retired_alerts = retired,
            opened = events.len(),
            "herd reset"
        );

        self.rng = rng;
        self.ids = ids;
        self.state = HerdState::new(now, animals, ledger);
        Ok(events)
    }

    /// One tick of the configured interval
    pub fn tick(&mut self) -> Result<Vec<AlertEvent>> {
        self.advance(self.config.tick_interval_seconds)
    }

    /// One step of an arbitrary duration
    pub fn advance(&mut self, elapsed_seconds: f64) -> Result<Vec<AlertEvent>> {
        let mut rng = self.rng.clone();
        match step(&self.state, elapsed_seconds, &self.config, &self.fences, &mut rng) {
            Ok(outcome) => {
                self.rng = rng;
                self.state = outcome.state;
                Ok(outcome.events)
            }
            Err(e) => {
                tracing::error!(tick = self.state.clock.tick, error = %e, "step aborted, keeping last good state");
                Err(e)
            }
        }
    }

    /// Run `ticks` ticks, stopping at the first failure
    pub fn run(&mut self, ticks: u64) -> Result<Vec<AlertEvent>> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.tick()?);
        }
        Ok(events)
    }

    pub fn acknowledge(&mut self, subject: &AnimalId, kind: AlertKind) -> Result<AlertEpisode> {
        let episode = self.state.ledger.acknowledge(subject, kind)?.clone();
        tracing::info!(subject = %subject, kind = %kind, "alert acknowledged");
        Ok(episode)
    }

    pub fn snapshot(&self) -> HerdSnapshot {
        HerdSnapshot::capture(&self.state, &self.ids, self.seed)
    }

    /// Resume from a stored snapshot
    ///
    /// Derived statuses are recomputed under the current configuration and
    /// fences, then checked against the stored open episodes. The RNG is
    /// re-derived from the snapshot's seed and tick.
    pub fn restore(&mut self, snapshot: HerdSnapshot) -> Result<()> {
        let HerdSnapshot { clock, seed, mut animals, episodes, ids, .. } = snapshot;

        ensure_unique_ids(&animals)?;
        for animal in &mut animals {
            animal.refresh(&self.config, &self.fences);
        }
        let ledger = AlertLedger::from_episodes(episodes)?;
        check_restored(&animals, &ledger)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(clock.tick);

        tracing::info!(
            tick = clock.tick,
            animals = animals.len(),
            open_alerts = ledger.open_count(),
            "simulation restored"
        );

        self.seed = seed;
        self.rng = rng;
        self.ids = ids;
        self.state = HerdState::new(clock, animals, ledger);
        Ok(())
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    pub fn fences(&self) -> &FenceSet {
        &self.fences
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &HerdState {
        &self.state
    }

    pub fn clock(&self) -> SimTime {
        self.state.clock
    }

    pub fn animals(&self) -> &[TrackedAnimal] {
        &self.state.animals
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.state.ledger
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }
}

/// Open episodes must match the restored statuses exactly
fn check_restored(animals: &[TrackedAnimal], ledger: &AlertLedger) -> Result<()> {
    for animal in animals {
        let expected = [
            (AlertKind::Health, animal.health_status().is_violating()),
            (AlertKind::GeoFence, animal.boundary_status().is_violating()),
        ];
        for (kind, violating) in expected {
            if ledger.is_open(&animal.id, kind) != violating {
                return Err(HerdError::inconsistent(format!(
                    "restored {} {} status disagrees with its episode history",
                    animal.id, kind
                )));
            }
        }
    }
    let matched: usize = animals
        .iter()
        .map(|a| AlertKind::ALL.iter().filter(|&&k| ledger.is_open(&a.id, k)).count())
        .sum();
    if matched != ledger.open_count() {
        return Err(HerdError::inconsistent(
            "snapshot has open episodes for animals it does not contain",
        ));
    }
    Ok(())
}
