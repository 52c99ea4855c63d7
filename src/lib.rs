//! Herd Watch - livestock telemetry simulation with geo-fence and health alerting

pub mod alerts;
pub mod core;
pub mod geofence;
pub mod health;
pub mod herd;
pub mod persistence;
pub mod simulation;
pub mod telemetry;
