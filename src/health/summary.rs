//! Herd-level aggregation
//!
//! A pure reduction over a slice of animals. Every animal lands in exactly
//! one health bucket, one boundary bucket and one device bucket of its own
//! category, so bucket totals always equal the input length.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Category;
use crate::herd::animal::{BoundaryStatus, DeviceStatus, HealthStatus, TrackedAnimal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub healthy: usize,
    pub warning: usize,
    pub alert: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: HealthStatus) {
        match status {
            HealthStatus::Healthy => self.healthy += 1,
            HealthStatus::Warning => self.warning += 1,
            HealthStatus::Alert => self.alert += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.warning + self.alert
    }

    /// Worst status present, `None` when empty
    pub fn worst(&self) -> Option<HealthStatus> {
        if self.alert > 0 {
            Some(HealthStatus::Alert)
        } else if self.warning > 0 {
            Some(HealthStatus::Warning)
        } else if self.healthy > 0 {
            Some(HealthStatus::Healthy)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryCounts {
    pub inside: usize,
    pub outside: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCounts {
    pub online: usize,
    pub offline: usize,
    pub battery_low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
    pub health: StatusCounts,
    pub boundary: BoundaryCounts,
    pub device: DeviceCounts,
}

impl CategorySummary {
    fn empty(category: Category) -> Self {
        Self {
            category,
            count: 0,
            health: StatusCounts::default(),
            boundary: BoundaryCounts::default(),
            device: DeviceCounts::default(),
        }
    }

    fn record(&mut self, animal: &TrackedAnimal) {
        self.count += 1;
        self.health.record(animal.health_status());
        match animal.boundary_status() {
            BoundaryStatus::Inside => self.boundary.inside += 1,
            BoundaryStatus::Outside => self.boundary.outside += 1,
        }
        match animal.device_status() {
            DeviceStatus::Online => self.device.online += 1,
            DeviceStatus::Offline => self.device.offline += 1,
            DeviceStatus::BatteryLow => self.device.battery_low += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerdSummary {
    pub total: usize,
    pub health: StatusCounts,
    /// Always holds all five categories, empty ones with zero counts
    pub by_category: BTreeMap<Category, CategorySummary>,
}

impl HerdSummary {
    pub fn category(&self, category: Category) -> Option<&CategorySummary> {
        self.by_category.get(&category)
    }

    /// Herd-level status: the worst status of any animal
    pub fn overall_status(&self) -> HealthStatus {
        self.health.worst().unwrap_or(HealthStatus::Healthy)
    }

    pub fn outside_count(&self) -> usize {
        self.by_category.values().map(|c| c.boundary.outside).sum()
    }
}

/// Count animals per status and per category
pub fn summarize(animals: &[TrackedAnimal]) -> HerdSummary {
    let mut by_category: BTreeMap<Category, CategorySummary> = Category::ALL
        .into_iter()
        .map(|c| (c, CategorySummary::empty(c)))
        .collect();
    let mut health = StatusCounts::default();

    for animal in animals {
        health.record(animal.health_status());
        by_category
            .entry(animal.category)
            .or_insert_with(|| CategorySummary::empty(animal.category))
            .record(animal);
    }

    HerdSummary {
        total: animals.len(),
        health,
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TelemetryConfig;
    use crate::core::types::SimTime;
    use crate::geofence::FenceSet;
    use crate::herd::generation::{generate_herd, HerdCounts, IdAllocator};
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn herd(seed: u64) -> Vec<TrackedAnimal> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut config = TelemetryConfig::default();
        // widen the cattle fever range so some alerts show up
        config.categories.cattle.vitals.temperature.max = 40.5;
        generate_herd(
            &HerdCounts::dashboard(),
            &config,
            &FenceSet::default_farm(),
            &mut IdAllocator::new(),
            SimTime::default(),
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_totals_match_input() {
        let animals = herd(11);
        let summary = summarize(&animals);
        assert_eq!(summary.total, animals.len());
        assert_eq!(summary.health.total(), animals.len());
        let per_category: usize = summary.by_category.values().map(|c| c.count).sum();
        assert_eq!(per_category, animals.len());
        for c in summary.by_category.values() {
            assert_eq!(c.health.total(), c.count);
            assert_eq!(c.boundary.inside + c.boundary.outside, c.count);
            assert_eq!(c.device.online + c.device.offline + c.device.battery_low, c.count);
        }
    }

    #[test]
    fn test_order_independent() {
        let animals = herd(12);
        let mut shuffled = animals.clone();
        shuffled.shuffle(&mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(summarize(&animals), summarize(&shuffled));
    }

    #[test]
    fn test_empty_herd_lists_every_category() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.by_category.len(), Category::ALL.len());
        assert_eq!(summary.overall_status(), HealthStatus::Healthy);
    }

    #[test]
    fn test_overall_status_is_worst() {
        let counts = StatusCounts { healthy: 10, warning: 2, alert: 0 };
        assert_eq!(counts.worst(), Some(HealthStatus::Warning));
        let counts = StatusCounts { healthy: 10, warning: 2, alert: 1 };
        assert_eq!(counts.worst(), Some(HealthStatus::Alert));
    }
}
