//! Telemetry configuration with documented constants
//!
//! Every tunable the generator, simulator and health aggregator read is
//! collected here. Defaults reproduce the farm used by the dashboard
//! (center near Guwahati, five-second polling).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{HerdError, Result};
use crate::core::types::{Category, GeoPoint};

/// Kilometres per degree of latitude (mean)
pub const KM_PER_DEGREE: f64 = 111.32;

/// Inclusive numeric range used for generator draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, what: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(HerdError::invalid(format!("{} range must be finite", what)));
        }
        if self.min > self.max {
            return Err(HerdError::invalid(format!(
                "{} range is inverted ({} > {})",
                what, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Plausible starting vitals for a category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalRanges {
    /// Body temperature in °C
    pub temperature: ValueRange,
    /// Heart rate in beats per minute
    pub heart_rate: ValueRange,
    /// Activity index (0-100)
    pub activity: ValueRange,
    /// Stress index (0-100)
    pub stress: ValueRange,
}

/// Per-metric escalation thresholds
///
/// `*_high` / `activity_low` escalate to alert, the `*_warning` levels to
/// warning. Comparisons are strict: a temperature equal to
/// `temperature_high` is still only a warning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalThresholds {
    pub temperature_warning: f64,
    pub temperature_high: f64,
    pub heart_rate_warning: f64,
    pub heart_rate_high: f64,
    pub stress_warning: f64,
    pub stress_high: f64,
    pub activity_warning: f64,
    pub activity_low: f64,
}

impl VitalThresholds {
    fn validate(&self, category: Category) -> Result<()> {
        let values = [
            self.temperature_warning,
            self.temperature_high,
            self.heart_rate_warning,
            self.heart_rate_high,
            self.stress_warning,
            self.stress_high,
            self.activity_warning,
            self.activity_low,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(HerdError::invalid(format!(
                "{} thresholds must be finite",
                category
            )));
        }

        // Warning levels sit strictly before the alert level
        let ordered = self.temperature_warning < self.temperature_high
            && self.heart_rate_warning < self.heart_rate_high
            && self.stress_warning < self.stress_high
            && self.activity_warning > self.activity_low;
        if !ordered {
            return Err(HerdError::invalid(format!(
                "{} warning thresholds must be strictly inside the alert thresholds",
                category
            )));
        }
        Ok(())
    }
}

/// Largest change a vital may make in a single tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalDeltas {
    pub temperature: f64,
    pub heart_rate: f64,
    pub activity: f64,
    pub stress: f64,
}

impl Default for VitalDeltas {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            heart_rate: 1.0,
            activity: 1.5,
            stress: 0.75,
        }
    }
}

/// Everything that varies by livestock category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// Half-width of the spawn square around the farm center, in degrees
    ///
    /// Denser herds are kept tighter: poultry sits in a small run,
    /// cattle graze the full pasture.
    pub radius: f64,

    /// Upper bound for generated walking speed (km/h)
    pub max_speed_kmh: f64,

    pub vitals: VitalRanges,
    pub thresholds: VitalThresholds,
}

impl CategoryProfile {
    fn validate(&self, category: Category) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(HerdError::invalid(format!(
                "{} radius must be positive, got {}",
                category, self.radius
            )));
        }
        if !self.max_speed_kmh.is_finite() || self.max_speed_kmh < 0.0 {
            return Err(HerdError::invalid(format!(
                "{} max_speed_kmh must be non-negative, got {}",
                category, self.max_speed_kmh
            )));
        }
        self.vitals.temperature.validate("temperature")?;
        self.vitals.heart_rate.validate("heart_rate")?;
        self.vitals.activity.validate("activity")?;
        self.vitals.stress.validate("stress")?;
        for (what, range) in [("activity", self.vitals.activity), ("stress", self.vitals.stress)] {
            if range.min < 0.0 || range.max > 100.0 {
                return Err(HerdError::invalid(format!(
                    "{} {} range must lie within 0-100",
                    category, what
                )));
            }
        }
        self.thresholds.validate(category)
    }

    fn ruminant(radius: f64, max_speed_kmh: f64, heart_rate: ValueRange) -> Self {
        Self {
            radius,
            max_speed_kmh,
            vitals: VitalRanges {
                temperature: ValueRange::new(38.0, 39.2),
                heart_rate,
                activity: ValueRange::new(60.0, 100.0),
                stress: ValueRange::new(20.0, 45.0),
            },
            thresholds: VitalThresholds {
                temperature_warning: 39.3,
                temperature_high: 39.5,
                heart_rate_warning: 90.0,
                heart_rate_high: 100.0,
                stress_warning: 50.0,
                stress_high: 75.0,
                activity_warning: 40.0,
                activity_low: 30.0,
            },
        }
    }

    fn small_stock(radius: f64, max_speed_kmh: f64, heart_rate: ValueRange, hr_warn: f64, hr_high: f64) -> Self {
        Self {
            radius,
            max_speed_kmh,
            vitals: VitalRanges {
                temperature: ValueRange::new(38.5, 39.6),
                heart_rate,
                activity: ValueRange::new(60.0, 100.0),
                stress: ValueRange::new(20.0, 45.0),
            },
            thresholds: VitalThresholds {
                temperature_warning: 39.8,
                temperature_high: 40.0,
                heart_rate_warning: hr_warn,
                heart_rate_high: hr_high,
                stress_warning: 50.0,
                stress_high: 75.0,
                activity_warning: 40.0,
                activity_low: 30.0,
            },
        }
    }
}

/// One profile per category; total by construction
///
/// Categories left out of a config file keep their built-in profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTable {
    pub cattle: CategoryProfile,
    pub mithun: CategoryProfile,
    pub goats: CategoryProfile,
    pub pigs: CategoryProfile,
    pub poultry: CategoryProfile,
}

impl CategoryTable {
    pub fn get(&self, category: Category) -> &CategoryProfile {
        match category {
            Category::Cattle => &self.cattle,
            Category::Mithun => &self.mithun,
            Category::Goats => &self.goats,
            Category::Pigs => &self.pigs,
            Category::Poultry => &self.poultry,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut CategoryProfile {
        match category {
            Category::Cattle => &mut self.cattle,
            Category::Mithun => &mut self.mithun,
            Category::Goats => &mut self.goats,
            Category::Pigs => &mut self.pigs,
            Category::Poultry => &mut self.poultry,
        }
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            cattle: CategoryProfile::ruminant(0.005, 2.0, ValueRange::new(60.0, 85.0)),
            mithun: CategoryProfile::ruminant(0.005, 2.0, ValueRange::new(55.0, 80.0)),
            goats: CategoryProfile::small_stock(0.004, 1.5, ValueRange::new(70.0, 100.0), 110.0, 120.0),
            pigs: CategoryProfile::small_stock(0.003, 1.0, ValueRange::new(70.0, 110.0), 120.0, 130.0),
            poultry: CategoryProfile {
                radius: 0.002,
                max_speed_kmh: 0.5,
                vitals: VitalRanges {
                    temperature: ValueRange::new(40.6, 41.6),
                    heart_rate: ValueRange::new(250.0, 350.0),
                    activity: ValueRange::new(60.0, 100.0),
                    stress: ValueRange::new(20.0, 45.0),
                },
                thresholds: VitalThresholds {
                    temperature_warning: 42.0,
                    temperature_high: 42.5,
                    heart_rate_warning: 380.0,
                    heart_rate_high: 420.0,
                    stress_warning: 50.0,
                    stress_high: 75.0,
                    activity_warning: 40.0,
                    activity_low: 30.0,
                },
            },
        }
    }
}

/// A named polygon as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FenceConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub points: Vec<GeoPoint>,
}

/// Configuration for the telemetry simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    // === REGION ===
    pub center_lat: f64,
    pub center_lng: f64,

    // === CLOCK ===
    /// Simulated seconds per tick
    pub tick_interval_seconds: f64,

    // === MOVEMENT ===
    /// Heading is nudged by a uniform draw in ±this many degrees per tick
    pub max_heading_drift_degrees: f64,

    // === VITALS ===
    pub max_vital_delta: VitalDeltas,

    // === COLLAR DEVICES ===
    /// Battery percentage lost per tick
    pub battery_drain_per_tick: f64,
    /// Below this percentage a collar reports battery_low
    pub battery_low_threshold: f64,

    pub categories: CategoryTable,

    /// Geo-fences; `None` means the built-in farm layout
    pub fences: Option<Vec<FenceConfig>>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            center_lat: 26.1158,
            center_lng: 91.7086,
            tick_interval_seconds: 5.0,
            max_heading_drift_degrees: 10.0,
            max_vital_delta: VitalDeltas::default(),
            battery_drain_per_tick: 0.01,
            battery_low_threshold: 20.0,
            categories: CategoryTable::default(),
            fences: None,
        }
    }
}

impl TelemetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_lat, self.center_lng)
    }

    pub fn profile(&self, category: Category) -> &CategoryProfile {
        self.categories.get(category)
    }

    /// Upper bound on how far (in degrees, per axis) one animal of
    /// `category` can move in a single tick
    ///
    /// Longitude degrees shrink with latitude, so the bound uses the cosine
    /// one degree poleward of the center.
    pub fn max_step_degrees(&self, category: Category) -> f64 {
        let km = self.profile(category).max_speed_kmh * self.tick_interval_seconds / 3600.0;
        let lat = (self.center_lat.abs() + 1.0).min(89.0);
        km / KM_PER_DEGREE / lat.to_radians().cos()
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TelemetryConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !self.center().is_finite() {
            return Err(HerdError::invalid("center coordinates must be finite"));
        }
        if self.center_lat.abs() > 90.0 || self.center_lng.abs() > 180.0 {
            return Err(HerdError::invalid(format!(
                "center ({}, {}) is outside valid lat/lng bounds",
                self.center_lat, self.center_lng
            )));
        }
        if !self.tick_interval_seconds.is_finite() || self.tick_interval_seconds <= 0.0 {
            return Err(HerdError::invalid(format!(
                "tick_interval_seconds must be positive, got {}",
                self.tick_interval_seconds
            )));
        }
        if !(0.0..=180.0).contains(&self.max_heading_drift_degrees) {
            return Err(HerdError::invalid(format!(
                "max_heading_drift_degrees must be within [0, 180], got {}",
                self.max_heading_drift_degrees
            )));
        }

        let d = &self.max_vital_delta;
        let deltas = [d.temperature, d.heart_rate, d.activity, d.stress];
        if deltas.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(HerdError::invalid("max_vital_delta entries must be finite and non-negative"));
        }

        if !self.battery_drain_per_tick.is_finite() || self.battery_drain_per_tick < 0.0 {
            return Err(HerdError::invalid("battery_drain_per_tick must be non-negative"));
        }
        if !(0.0..=100.0).contains(&self.battery_low_threshold) {
            return Err(HerdError::invalid("battery_low_threshold must be a percentage"));
        }

        for category in Category::ALL {
            self.profile(category).validate(category)?;
        }
        Ok(())
    }
}
