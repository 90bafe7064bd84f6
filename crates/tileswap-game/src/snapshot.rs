use std::{cell::RefCell, rc::Rc};

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tileswap_core::PieceId;

/// The persisted, resumable form of a session.
///
/// One logical record per player. Writing a snapshot and reading it back must
/// reproduce an equivalent session state; the fields are deliberately plain so
/// any key-value backend can round-trip them.
///
/// Failure count is not stored: it advances in lockstep with
/// `failure_levels`, so resume derives it from the history's length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Side length of the grid the arrangement belongs to.
    pub grid_size: u8,
    /// Current piece arrangement, position order.
    pub arrangement: Vec<PieceId>,
    /// Accumulated score; may be negative or fractional.
    pub score: f64,
    /// Current level, 1-based.
    pub level: u32,
    /// Incorrect moves made in the persisted round.
    pub incorrect_moves: u32,
    /// Levels at which a timeout was recorded, in order.
    pub failure_levels: Vec<u32>,
}

/// Error raised by a [`SnapshotStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("snapshot store failure: {message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Creates a store error with a backend-specific message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Storage capability for the single session snapshot record.
///
/// Injected into [`Session`](crate::Session) at construction; the session
/// saves after every state-changing operation and loads once at resume. There
/// are no concurrent writers, so last-write-wins is sufficient.
pub trait SnapshotStore {
    /// Loads the stored snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read. A readable but
    /// malformed record should also surface here; the session treats either
    /// as "start fresh".
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    /// Stores a snapshot, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Removes the stored record entirely.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for Rc<T> {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for Box<T> {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// An in-memory [`SnapshotStore`], used by tests and transient sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RefCell<Option<Snapshot>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stored snapshot, if any.
    #[must_use]
    pub fn saved(&self) -> Option<Snapshot> {
        self.record.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.record.borrow().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        *self.record.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.record.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            grid_size: 3,
            arrangement: vec![2, 1, 3, 4, 5, 6, 7, 9, 8],
            score: 4.5,
            level: 2,
            incorrect_moves: 1,
            failure_levels: vec![1, 2],
        }
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snapshot = sample();
        let encoded = serde_json::to_string(&snapshot).expect("snapshot serializes");
        let decoded: Snapshot = serde_json::from_str(&encoded).expect("snapshot deserializes");
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        assert_eq!(store.load().expect("load works"), None);

        let first = sample();
        store.save(&first).expect("save works");
        let mut second = sample();
        second.score = 9.0;
        store.save(&second).expect("save works");

        assert_eq!(store.load().expect("load works"), Some(second));

        store.clear().expect("clear works");
        assert_eq!(store.load().expect("load works"), None);
    }
}
