//! Initial population generation

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{TelemetryConfig, ValueRange};
use crate::core::error::{HerdError, Result};
use crate::core::types::{AnimalId, Category, GeoPoint, SimTime};
use crate::geofence::FenceSet;
use crate::herd::animal::{
    Gender, Physique, Productivity, ProductivityMetric, ProductivityRecord, TrackedAnimal, Vitals,
};

/// Months of productivity history carried by each animal
pub const HISTORY_MONTHS: u32 = 6;

/// Largest population a single request may ask for
pub const MAX_HERD_SIZE: i64 = 1_000_000;

/// Requested head count per category
///
/// Counts are signed so that a negative request coming from a config file
/// or the command line reaches [`HerdCounts::validate`] instead of being
/// clamped on the way in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HerdCounts {
    pub cattle: i64,
    pub mithun: i64,
    pub goats: i64,
    pub pigs: i64,
    pub poultry: i64,
}

impl HerdCounts {
    /// The herd shown on the dashboard landing page
    pub fn dashboard() -> Self {
        Self {
            cattle: 25,
            mithun: 15,
            goats: 40,
            pigs: 30,
            poultry: 100,
        }
    }

    pub fn only(category: Category, count: i64) -> Self {
        let mut counts = Self::default();
        counts.set(category, count);
        counts
    }

    pub fn get(&self, category: Category) -> i64 {
        match category {
            Category::Cattle => self.cattle,
            Category::Mithun => self.mithun,
            Category::Goats => self.goats,
            Category::Pigs => self.pigs,
            Category::Poultry => self.poultry,
        }
    }

    pub fn set(&mut self, category: Category, count: i64) {
        match category {
            Category::Cattle => self.cattle = count,
            Category::Mithun => self.mithun = count,
            Category::Goats => self.goats = count,
            Category::Pigs => self.pigs = count,
            Category::Poultry => self.poultry = count,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let count = self.get(category);
            if count < 0 {
                return Err(HerdError::invalid(format!(
                    "requested {} count must be non-negative, got {}",
                    category, count
                )));
            }
        }
        let total = self.total();
        if total > MAX_HERD_SIZE {
            return Err(HerdError::invalid(format!(
                "requested herd of {} animals exceeds the limit of {}",
                total, MAX_HERD_SIZE
            )));
        }
        Ok(())
    }

    /// Sum of the non-negative counts, saturating at `i64::MAX`
    pub fn total(&self) -> i64 {
        Category::ALL
            .iter()
            .fold(0i64, |acc, c| acc.saturating_add(self.get(*c).max(0)))
    }
}

/// Hands out per-category sequence numbers; never rewinds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdAllocator {
    issued: BTreeMap<Category, u64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequence number for `category`, starting at 1
    pub fn next(&mut self, category: Category) -> u64 {
        let counter = self.issued.entry(category).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn issued(&self, category: Category) -> u64 {
        self.issued.get(&category).copied().unwrap_or(0)
    }
}

fn sample<R: Rng + ?Sized>(range: ValueRange, rng: &mut R) -> f64 {
    if range.max > range.min {
        rng.gen_range(range.min..=range.max)
    } else {
        range.min
    }
}

fn generate_animal<R: Rng + ?Sized>(
    category: Category,
    seq: u64,
    config: &TelemetryConfig,
    fences: &FenceSet,
    now: SimTime,
    rng: &mut R,
) -> TrackedAnimal {
    let profile = config.profile(category);
    let center = config.center();

    let position = GeoPoint::new(
        center.lat + rng.gen_range(-profile.radius..=profile.radius),
        center.lng + rng.gen_range(-profile.radius..=profile.radius),
    );
    let heading = rng.gen_range(0.0..360.0);
    let speed = sample(ValueRange::new(0.0, profile.max_speed_kmh), rng);

    let vitals = Vitals {
        temperature: sample(profile.vitals.temperature, rng),
        heart_rate: sample(profile.vitals.heart_rate, rng),
        activity: sample(profile.vitals.activity, rng),
        stress: sample(profile.vitals.stress, rng),
    };

    let breed = category.breeds().choose(rng).copied().unwrap_or("Unknown");
    let physique = Physique {
        age_months: rng.gen_range(1..=60),
        weight_kg: rng.gen_range(200..500) as f64,
        gender: if rng.gen_bool(0.5) { Gender::Male } else { Gender::Female },
    };
    let battery_level = rng.gen_range(50.0..=100.0);
    let value = rng.gen_range(5..25) as f64;
    let history = (0..HISTORY_MONTHS)
        .rev()
        .map(|months_ago| ProductivityRecord {
            months_ago,
            value: rng.gen_range(5..25) as f64,
        })
        .collect();
    let productivity = Productivity {
        metric: ProductivityMetric::for_category(category),
        value,
        history,
    };

    TrackedAnimal::new(
        AnimalId::new(format!("{}-{}", category.name(), seq)),
        format!("{} #{}", category.label(), seq),
        category,
        breed.to_string(),
        format!("DEV-{}-{}", category.device_tag(), seq),
        physique,
        position,
        heading,
        speed,
        vitals,
        battery_level,
        productivity,
        now,
        config,
        fences,
    )
}

/// Generate a fresh population
///
/// Positions are uniform in the square `center ± radius` of each category,
/// vitals uniform in the category's plausible ranges. Derived statuses are
/// computed before the animals are returned. Nothing is allocated from
/// `ids` when the request is rejected.
pub fn generate_herd<R: Rng + ?Sized>(
    counts: &HerdCounts,
    config: &TelemetryConfig,
    fences: &FenceSet,
    ids: &mut IdAllocator,
    now: SimTime,
    rng: &mut R,
) -> Result<Vec<TrackedAnimal>> {
    counts.validate()?;
    config.validate()?;

    let mut animals = Vec::with_capacity(counts.total() as usize);
    for category in Category::ALL {
        for _ in 0..counts.get(category) {
            let seq = ids.next(category);
            animals.push(generate_animal(category, seq, config, fences, now, rng));
        }
    }
    Ok(animals)
}
