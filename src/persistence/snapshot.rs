//! Serializable view of the herd at one instant

use serde::{Deserialize, Serialize};

use crate::alerts::AlertEpisode;
use crate::core::error::Result;
use crate::core::types::{AnimalId, Category, SimTime};
use crate::health::{summarize, HerdSummary};
use crate::herd::animal::TrackedAnimal;
use crate::herd::generation::IdAllocator;
use crate::simulation::HerdState;

/// What the presentation layer renders and what stores persist
///
/// Snapshots are immutable copies; holding one never blocks the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerdSnapshot {
    pub clock: SimTime,
    pub seed: u64,
    pub animals: Vec<TrackedAnimal>,
    /// Full episode history, open and closed
    pub episodes: Vec<AlertEpisode>,
    pub summary: HerdSummary,
    pub ids: IdAllocator,
}

impl HerdSnapshot {
    pub fn capture(state: &HerdState, ids: &IdAllocator, seed: u64) -> Self {
        Self {
            clock: state.clock,
            seed,
            animals: state.animals.clone(),
            episodes: state.ledger.episodes().to_vec(),
            summary: summarize(&state.animals),
            ids: ids.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn animal(&self, id: &AnimalId) -> Option<&TrackedAnimal> {
        self.animals.iter().find(|a| &a.id == id)
    }

    pub fn animals_in(&self, category: Category) -> impl Iterator<Item = &TrackedAnimal> {
        self.animals.iter().filter(move |a| a.category == category)
    }

    pub fn open_episodes(&self) -> impl Iterator<Item = &AlertEpisode> {
        self.episodes.iter().filter(|e| e.is_open())
    }

    /// Multi-line text overview for terminals and logs
    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "t={} ({:.0}s)  animals={}  overall={:?}  outside={}  open alerts={}\n",
            self.clock.tick,
            self.clock.seconds,
            self.summary.total,
            self.summary.overall_status(),
            self.summary.outside_count(),
            self.open_episodes().count(),
        ));
        for summary in self.summary.by_category.values() {
            if summary.count == 0 {
                continue;
            }
            out.push_str(&format!(
                "  {:<8} {:>4}  healthy {:>4}  warning {:>3}  alert {:>3}  outside {:>3}  battery low {:>3}\n",
                summary.category.label(),
                summary.count,
                summary.health.healthy,
                summary.health.warning,
                summary.health.alert,
                summary.boundary.outside,
                summary.device.battery_low,
            ));
        }
        out
    }
}
