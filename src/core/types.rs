//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::HerdError;

/// Simulation tick counter
pub type Tick = u64;

/// Stable identifier for a tracked animal, e.g. `cattle-3`
///
/// Assigned once by the generator and never reused, even across resets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimalId(pub String);

impl AnimalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Livestock categories tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cattle,
    Mithun,
    Goats,
    Pigs,
    Poultry,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Cattle,
        Category::Mithun,
        Category::Goats,
        Category::Pigs,
        Category::Poultry,
    ];

    /// Lowercase name, also used as the id prefix
    pub fn name(&self) -> &'static str {
        match self {
            Category::Cattle => "cattle",
            Category::Mithun => "mithun",
            Category::Goats => "goats",
            Category::Pigs => "pigs",
            Category::Poultry => "poultry",
        }
    }

    /// Display label used in animal names ("Cattle #3")
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cattle => "Cattle",
            Category::Mithun => "Mithun",
            Category::Goats => "Goats",
            Category::Pigs => "Pigs",
            Category::Poultry => "Poultry",
        }
    }

    /// Three-letter tag used in collar device ids
    pub fn device_tag(&self) -> &'static str {
        match self {
            Category::Cattle => "CAT",
            Category::Mithun => "MIT",
            Category::Goats => "GOA",
            Category::Pigs => "PIG",
            Category::Poultry => "POU",
        }
    }

    pub fn breeds(&self) -> &'static [&'static str] {
        match self {
            Category::Cattle => &["Gir", "Sahiwal", "Red Sindhi"],
            Category::Mithun => &["Arunachalee Mithun", "Nagaland Mithun"],
            Category::Goats => &["Black Bengal", "Jamunapari"],
            Category::Pigs => &["Large White Yorkshire", "Landrace"],
            Category::Poultry => &["Aseel", "Kadaknath"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = HerdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| HerdError::invalid(format!("unknown livestock category '{}'", s)))
    }
}

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Largest per-axis offset from `other`, in degrees
    pub fn max_axis_offset(&self, other: &GeoPoint) -> f64 {
        (self.lat - other.lat).abs().max((self.lng - other.lng).abs())
    }
}

/// Simulated time: tick number plus accumulated seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimTime {
    pub tick: Tick,
    pub seconds: f64,
}

impl SimTime {
    pub fn advanced(&self, elapsed_seconds: f64) -> Self {
        Self {
            tick: self.tick + 1,
            seconds: self.seconds + elapsed_seconds,
        }
    }
}
