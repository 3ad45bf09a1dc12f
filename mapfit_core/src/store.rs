//! The workout store: an ordered in-memory collection with a persistence
//! round-trip through the blob store.
//!
//! Insertion order is display order is creation order. The store owns its
//! records exclusively; views render from borrowed references.

use crate::blob::BlobStore;
use crate::{Error, Result, Workout};
use uuid::Uuid;

/// Blob-store key under which the workout history is persisted.
pub const STORAGE_KEY: &str = "workouts";

/// Ordered collection of workout records.
#[derive(Debug, Default)]
pub struct WorkoutStore {
    records: Vec<Workout>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, preserving creation order.
    ///
    /// Ids are generated internally, so a collision is a programming error
    /// rather than a user error.
    pub fn add(&mut self, workout: Workout) -> Result<()> {
        let duplicate = self.records.iter().any(|w| w.id == workout.id);
        debug_assert!(!duplicate, "workout id {} already in store", workout.id);
        if duplicate {
            return Err(Error::DuplicateId(workout.id));
        }

        self.records.push(workout);
        Ok(())
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[Workout] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<&Workout> {
        self.records.iter().find(|w| w.id == id)
    }

    /// Encode all records as a JSON array, kind discriminant included.
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }

    /// Decode a record sequence produced by [`serialize`](Self::serialize).
    pub fn deserialize(data: &str) -> Result<Vec<Workout>> {
        serde_json::from_str(data).map_err(|e| Error::CorruptData(e.to_string()))
    }

    /// Write the full history to the blob store under [`STORAGE_KEY`].
    pub fn persist(&self, blob: &mut dyn BlobStore) -> Result<()> {
        let encoded = self.serialize()?;
        blob.write(STORAGE_KEY, &encoded)?;
        tracing::debug!("Persisted {} workouts", self.records.len());
        Ok(())
    }

    /// Load prior history from the blob store.
    ///
    /// Absent or corrupt data loads an empty history with a warning — a
    /// best-effort warm start, never an error for the caller.
    pub fn restore(blob: &dyn BlobStore) -> Self {
        let raw = match blob.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!("No persisted workouts found, starting empty");
                return Self::new();
            }
            Err(e) => {
                tracing::warn!("Unable to read persisted workouts: {}. Starting empty.", e);
                return Self::new();
            }
        };

        match Self::deserialize(&raw) {
            Ok(records) => {
                tracing::debug!("Restored {} workouts", records.len());
                Self { records }
            }
            Err(e) => {
                tracing::warn!("Persisted workouts are corrupt: {}. Starting empty.", e);
                Self::new()
            }
        }
    }
}
