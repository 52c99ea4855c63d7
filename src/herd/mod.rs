//! Tracked livestock and the generator that creates them

pub mod animal;
pub mod generation;

pub use animal::{
    BoundaryStatus, DeviceStatus, Gender, HealthStatus, Physique, Productivity, ProductivityMetric,
    ProductivityRecord, TrackedAnimal, Vitals,
};
pub use generation::{generate_herd, HerdCounts, IdAllocator, MAX_HERD_SIZE};
