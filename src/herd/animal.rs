//! Tracked animal model

use serde::{Deserialize, Serialize};

use crate::core::config::TelemetryConfig;
use crate::core::types::{AnimalId, Category, GeoPoint, SimTime};
use crate::geofence::{classify, FenceSet};
use crate::health::assess;

/// Collar vitals for one animal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// °C
    pub temperature: f64,
    /// Beats per minute
    pub heart_rate: f64,
    /// Activity index, 0-100
    pub activity: f64,
    /// Stress index, 0-100
    pub stress: f64,
}

impl Vitals {
    pub fn new(temperature: f64, heart_rate: f64, activity: f64, stress: f64) -> Self {
        Self { temperature, heart_rate, activity, stress }
    }
}

/// Health classification, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Alert,
}

impl HealthStatus {
    /// Only alert-level health opens an alert episode
    pub fn is_violating(&self) -> bool {
        matches!(self, HealthStatus::Alert)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryStatus {
    Inside,
    Outside,
}

impl BoundaryStatus {
    pub fn is_violating(&self) -> bool {
        matches!(self, BoundaryStatus::Outside)
    }
}

/// Collar device state, derived from battery level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Online,
    Offline,
    BatteryLow,
}

impl DeviceStatus {
    pub fn from_battery(level: f64, low_threshold: f64) -> Self {
        if level <= 0.0 {
            DeviceStatus::Offline
        } else if level < low_threshold {
            DeviceStatus::BatteryLow
        } else {
            DeviceStatus::Online
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductivityMetric {
    MilkProduction,
    MeatProduction,
    WeightGain,
    EggProduction,
}

impl ProductivityMetric {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Cattle | Category::Goats => ProductivityMetric::MilkProduction,
            Category::Mithun => ProductivityMetric::MeatProduction,
            Category::Pigs => ProductivityMetric::WeightGain,
            Category::Poultry => ProductivityMetric::EggProduction,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ProductivityMetric::MilkProduction => "liters/day",
            ProductivityMetric::MeatProduction | ProductivityMetric::WeightGain => "kg/month",
            ProductivityMetric::EggProduction => "eggs/week",
        }
    }
}

/// One monthly productivity reading; `months_ago` 0 is the current month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductivityRecord {
    pub months_ago: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Productivity {
    pub metric: ProductivityMetric,
    pub value: f64,
    /// Oldest first, ending with the current month
    pub history: Vec<ProductivityRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Fixed physical attributes recorded when the animal is tagged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physique {
    pub age_months: u32,
    pub weight_kg: f64,
    pub gender: Gender,
}

/// One collared animal as seen by the dashboard
///
/// `health_status`, `boundary_status` and `device_status` are derived and
/// can only be changed through [`TrackedAnimal::refresh`], which recomputes
/// them from vitals, position and battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedAnimal {
    pub id: AnimalId,
    pub name: String,
    pub category: Category,
    pub breed: String,
    pub device_id: String,
    pub physique: Physique,
    pub position: GeoPoint,
    /// Degrees clockwise from north, in [0, 360)
    pub heading: f64,
    /// km/h, never negative
    pub speed: f64,
    pub vitals: Vitals,
    /// Percent, 0-100
    pub battery_level: f64,
    pub productivity: Productivity,
    pub last_updated: SimTime,
    health_status: HealthStatus,
    boundary_status: BoundaryStatus,
    device_status: DeviceStatus,
}

impl TrackedAnimal {
    /// Build an animal and compute its derived statuses immediately
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: AnimalId,
        name: String,
        category: Category,
        breed: String,
        device_id: String,
        physique: Physique,
        position: GeoPoint,
        heading: f64,
        speed: f64,
        vitals: Vitals,
        battery_level: f64,
        productivity: Productivity,
        now: SimTime,
        config: &TelemetryConfig,
        fences: &FenceSet,
    ) -> Self {
        let mut animal = Self {
            id,
            name,
            category,
            breed,
            device_id,
            physique,
            position,
            heading,
            speed,
            vitals,
            battery_level,
            productivity,
            last_updated: now,
            health_status: HealthStatus::Healthy,
            boundary_status: BoundaryStatus::Inside,
            device_status: DeviceStatus::Online,
        };
        animal.refresh(config, fences);
        animal
    }

    pub fn health_status(&self) -> HealthStatus {
        self.health_status
    }

    pub fn boundary_status(&self) -> BoundaryStatus {
        self.boundary_status
    }

    pub fn device_status(&self) -> DeviceStatus {
        self.device_status
    }

    /// Recompute every derived status from current vitals, position and battery
    pub fn refresh(&mut self, config: &TelemetryConfig, fences: &FenceSet) {
        self.health_status = assess(&self.vitals, &config.profile(self.category).thresholds);
        self.boundary_status = classify(self.position, fences);
        self.device_status = DeviceStatus::from_battery(self.battery_level, config.battery_low_threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_ordering() {
        assert!(HealthStatus::Alert > HealthStatus::Warning);
        assert!(HealthStatus::Warning > HealthStatus::Healthy);
        assert_eq!(
            [HealthStatus::Warning, HealthStatus::Alert, HealthStatus::Healthy]
                .into_iter()
                .max(),
            Some(HealthStatus::Alert)
        );
    }

    #[test]
    fn test_device_status_from_battery() {
        assert_eq!(DeviceStatus::from_battery(80.0, 20.0), DeviceStatus::Online);
        assert_eq!(DeviceStatus::from_battery(19.9, 20.0), DeviceStatus::BatteryLow);
        assert_eq!(DeviceStatus::from_battery(0.0, 20.0), DeviceStatus::Offline);
    }

    #[test]
    fn test_productivity_units() {
        assert_eq!(ProductivityMetric::for_category(Category::Poultry).unit(), "eggs/week");
        assert_eq!(ProductivityMetric::for_category(Category::Goats).unit(), "liters/day");
        assert_eq!(ProductivityMetric::for_category(Category::Mithun).unit(), "kg/month");
    }

    #[test]
    fn test_refresh_tracks_vitals() {
        let config = TelemetryConfig::default();
        let fences = FenceSet::default_farm();
        let mut animal = TrackedAnimal::new(
            AnimalId::new("cattle-1"),
            "Cattle #1".into(),
            Category::Cattle,
            "Gir".into(),
            "DEV-CAT-1".into(),
            Physique { age_months: 24, weight_kg: 350.0, gender: Gender::Female },
            config.center(),
            0.0,
            0.0,
            Vitals::new(38.5, 70.0, 80.0, 30.0),
            90.0,
            Productivity {
                metric: ProductivityMetric::MilkProduction,
                value: 12.0,
                history: Vec::new(),
            },
            SimTime::default(),
            &config,
            &fences,
        );
        assert_eq!(animal.health_status(), HealthStatus::Healthy);
        assert_eq!(animal.boundary_status(), BoundaryStatus::Inside);

        animal.vitals.temperature = 40.0;
        animal.position = GeoPoint::new(36.0, 91.7);
        animal.refresh(&config, &fences);
        assert_eq!(animal.health_status(), HealthStatus::Alert);
        assert_eq!(animal.boundary_status(), BoundaryStatus::Outside);
    }
}
