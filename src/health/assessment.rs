//! Per-animal health assessment against category thresholds

use serde::{Deserialize, Serialize};

use crate::core::config::VitalThresholds;
use crate::herd::animal::{HealthStatus, Vitals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalMetric {
    Temperature,
    HeartRate,
    Activity,
    Stress,
}

impl VitalMetric {
    pub fn name(&self) -> &'static str {
        match self {
            VitalMetric::Temperature => "temperature",
            VitalMetric::HeartRate => "heart_rate",
            VitalMetric::Activity => "activity",
            VitalMetric::Stress => "stress",
        }
    }
}

/// One metric's contribution to the overall status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthFinding {
    pub metric: VitalMetric,
    pub value: f64,
    pub status: HealthStatus,
}

fn above(value: f64, warning: f64, high: f64) -> HealthStatus {
    if value > high {
        HealthStatus::Alert
    } else if value > warning {
        HealthStatus::Warning
    } else {
        HealthStatus::Healthy
    }
}

fn below(value: f64, warning: f64, low: f64) -> HealthStatus {
    if value < low {
        HealthStatus::Alert
    } else if value < warning {
        HealthStatus::Warning
    } else {
        HealthStatus::Healthy
    }
}

/// Status of every metric, in a fixed order
pub fn findings(vitals: &Vitals, t: &VitalThresholds) -> [HealthFinding; 4] {
    [
        HealthFinding {
            metric: VitalMetric::Temperature,
            value: vitals.temperature,
            status: above(vitals.temperature, t.temperature_warning, t.temperature_high),
        },
        HealthFinding {
            metric: VitalMetric::HeartRate,
            value: vitals.heart_rate,
            status: above(vitals.heart_rate, t.heart_rate_warning, t.heart_rate_high),
        },
        HealthFinding {
            metric: VitalMetric::Activity,
            value: vitals.activity,
            status: below(vitals.activity, t.activity_warning, t.activity_low),
        },
        HealthFinding {
            metric: VitalMetric::Stress,
            value: vitals.stress,
            status: above(vitals.stress, t.stress_warning, t.stress_high),
        },
    ]
}

/// Worst status across all metrics (alert > warning > healthy)
///
/// A non-finite reading cannot be vouched for and is treated as an alert.
pub fn assess(vitals: &Vitals, thresholds: &VitalThresholds) -> HealthStatus {
    findings(vitals, thresholds)
        .iter()
        .map(|f| {
            if f.value.is_finite() {
                f.status
            } else {
                HealthStatus::Alert
            }
        })
        .max()
        .unwrap_or(HealthStatus::Healthy)
}

/// Short description of the metrics at the given status, e.g. "temperature 40.0"
pub fn describe(vitals: &Vitals, thresholds: &VitalThresholds, status: HealthStatus) -> String {
    let parts: Vec<String> = findings(vitals, thresholds)
        .iter()
        .filter(|f| f.status == status)
        .map(|f| format!("{} {:.1}", f.metric.name(), f.value))
        .collect();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CategoryTable;

    fn cattle() -> VitalThresholds {
        CategoryTable::default().cattle.thresholds
    }

    fn normal() -> Vitals {
        Vitals::new(38.6, 72.0, 80.0, 30.0)
    }

    #[test]
    fn test_normal_vitals_are_healthy() {
        assert_eq!(assess(&normal(), &cattle()), HealthStatus::Healthy);
    }

    #[test]
    fn test_fever_is_alert() {
        let vitals = Vitals { temperature: 40.0, ..normal() };
        assert_eq!(assess(&vitals, &cattle()), HealthStatus::Alert);
        assert_eq!(describe(&vitals, &cattle(), HealthStatus::Alert), "temperature 40.0");
    }

    #[test]
    fn test_threshold_comparison_is_strict() {
        let at_threshold = Vitals { temperature: 39.5, ..normal() };
        assert_eq!(assess(&at_threshold, &cattle()), HealthStatus::Warning);
    }

    #[test]
    fn test_low_activity_escalates() {
        let sluggish = Vitals { activity: 35.0, ..normal() };
        assert_eq!(assess(&sluggish, &cattle()), HealthStatus::Warning);
        let idle = Vitals { activity: 10.0, ..normal() };
        assert_eq!(assess(&idle, &cattle()), HealthStatus::Alert);
    }

    #[test]
    fn test_worst_metric_wins() {
        let vitals = Vitals { stress: 60.0, heart_rate: 105.0, ..normal() };
        assert_eq!(assess(&vitals, &cattle()), HealthStatus::Alert);
        let vitals = Vitals { stress: 60.0, ..normal() };
        assert_eq!(assess(&vitals, &cattle()), HealthStatus::Warning);
    }

    #[test]
    fn test_nan_reading_is_alert() {
        let vitals = Vitals { heart_rate: f64::NAN, ..normal() };
        assert_eq!(assess(&vitals, &cattle()), HealthStatus::Alert);
    }

    #[test]
    fn test_assessment_is_repeatable() {
        let vitals = Vitals { temperature: 39.4, stress: 52.0, ..normal() };
        assert_eq!(assess(&vitals, &cattle()), assess(&vitals, &cattle()));
    }
}
