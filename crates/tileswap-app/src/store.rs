use std::{fs, io::ErrorKind, path::PathBuf};

use tileswap_game::{Snapshot, SnapshotStore, StoreError};

/// A [`SnapshotStore`] backed by a single JSON file.
///
/// A missing file reads as "no snapshot"; an unreadable or malformed file
/// surfaces as a [`StoreError`], which the session turns into a fresh start.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::new(err.to_string())),
        };
        let snapshot = serde_json::from_str(&contents)
            .map_err(|err| StoreError::new(format!("malformed snapshot file: {err}")))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(snapshot)
            .map_err(|err| StoreError::new(err.to_string()))?;
        fs::write(&self.path, contents).map_err(|err| StoreError::new(err.to_string()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::new(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    struct TempPath(PathBuf);

    impl TempPath {
        fn new(tag: &str) -> Self {
            Self(env::temp_dir().join(format!("tileswap-{tag}-{}.json", std::process::id())))
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn sample() -> Snapshot {
        Snapshot {
            grid_size: 2,
            arrangement: vec![2, 1, 3, 4],
            score: 3.0,
            level: 1,
            incorrect_moves: 0,
            failure_levels: vec![],
        }
    }

    #[test]
    fn test_missing_file_reads_as_no_snapshot() {
        let path = TempPath::new("missing");
        let store = JsonFileStore::new(&path.0);
        assert_eq!(store.load().expect("missing file is fine"), None);
        store.clear().expect("clearing a missing file is fine");
    }

    #[test]
    fn test_save_load_clear_round_trip() {
        let path = TempPath::new("roundtrip");
        let store = JsonFileStore::new(&path.0);

        let snapshot = sample();
        store.save(&snapshot).expect("save");
        assert_eq!(store.load().expect("load"), Some(snapshot));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn test_malformed_file_surfaces_as_store_error() {
        let path = TempPath::new("malformed");
        fs::write(&path.0, "not json at all").expect("write test file");
        let store = JsonFileStore::new(&path.0);
        assert!(store.load().is_err());
    }
}
