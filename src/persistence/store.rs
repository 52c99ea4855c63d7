//! Storage backends for snapshots

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::persistence::snapshot::HerdSnapshot;

/// Anything that can keep the latest snapshot
pub trait SnapshotStore {
    fn save(&mut self, snapshot: &HerdSnapshot) -> Result<()>;

    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<HerdSnapshot>>;
}

/// Keeps the last snapshot in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    latest: Option<HerdSnapshot>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &HerdSnapshot) -> Result<()> {
        self.latest = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<HerdSnapshot>> {
        Ok(self.latest.clone())
    }
}

/// Pretty JSON file on disk, rewritten on every save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&mut self, snapshot: &HerdSnapshot) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        // Write beside the target then rename, so readers never see half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, snapshot.to_json()?)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), tick = snapshot.clock.tick, "snapshot saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<HerdSnapshot>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(HerdSnapshot::from_json(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::HerdError;
    use crate::core::types::SimTime;
    use crate::health::summarize;
    use crate::herd::generation::IdAllocator;

    fn empty_snapshot(tick: u64) -> HerdSnapshot {
        HerdSnapshot {
            clock: SimTime { tick, seconds: tick as f64 * 5.0 },
            seed: 42,
            animals: Vec::new(),
            episodes: Vec::new(),
            summary: summarize(&[]),
            ids: IdAllocator::new(),
        }
    }

    #[test]
    fn test_memory_store_keeps_latest() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&empty_snapshot(1)).unwrap();
        store.save(&empty_snapshot(2)).unwrap();
        assert_eq!(store.load().unwrap().unwrap().clock.tick, 2);
        assert_eq!(store.saves(), 2);
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = std::env::temp_dir().join("herd_watch_test_json_store");
        let _ = fs::remove_dir_all(&dir);
        let mut store = JsonFileStore::new(dir.join("nested").join("herd.json"));

        assert!(store.load().unwrap().is_none());
        store.save(&empty_snapshot(7)).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, empty_snapshot(7));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let dir = std::env::temp_dir().join("herd_watch_test_json_garbage");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("herd.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, HerdError::Serialization(_)));

        let _ = fs::remove_dir_all(&dir);
    }
}
