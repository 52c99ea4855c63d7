//! Snapshot persistence behind a small save/load interface

pub mod snapshot;
pub mod store;

pub use snapshot::HerdSnapshot;
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
