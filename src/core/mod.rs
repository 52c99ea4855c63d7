pub mod config;
pub mod error;
pub mod types;

pub use config::TelemetryConfig;
pub use error::{HerdError, Result};
pub use types::{AnimalId, Category, GeoPoint, SimTime, Tick};
