//! Health aggregation: per-animal status and herd summaries

pub mod assessment;
pub mod summary;

pub use assessment::{assess, describe, findings, HealthFinding, VitalMetric};
pub use summary::{
    summarize, BoundaryCounts, CategorySummary, DeviceCounts, HerdSummary, StatusCounts,
};
