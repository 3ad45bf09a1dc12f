//! Blob-store capability: an opaque, string-keyed persistent value store.
//!
//! The store sees only strings; encoding and decoding of workout data is
//! the `WorkoutStore`'s job. Two implementations are provided: an in-memory
//! map for tests and ephemeral runs, and a file-per-key store with locking
//! and atomic replacement for real persistence.

use crate::{Error, Result};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// String-keyed blob storage.
pub trait BlobStore {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory blob store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    values: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed blob store: one `<key>.json` file per key under a directory.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    /// Read with a shared lock. A missing file is `None`, not an error.
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        Ok(Some(contents))
    }

    /// Atomically replace the value by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let temp = NamedTempFile::new_in(&self.dir)?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(self.key_path(key))
            .map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote blob under key {:?} in {:?}", key, self.dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryBlobStore::new();
        assert_eq!(store.read("workouts").unwrap(), None);

        store.write("workouts", "[]").unwrap();
        assert_eq!(store.read("workouts").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileBlobStore::new(temp_dir.path());

        store.write("workouts", r#"[{"x":1}]"#).unwrap();
        let value = store.read("workouts").unwrap();
        assert_eq!(value.as_deref(), Some(r#"[{"x":1}]"#));
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(temp_dir.path());
        assert_eq!(store.read("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_file_store_overwrite_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileBlobStore::new(temp_dir.path());

        store.write("workouts", "first").unwrap();
        store.write("workouts", "second").unwrap();

        assert_eq!(store.read("workouts").unwrap().as_deref(), Some("second"));

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "workouts.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only workouts.json, found extras: {:?}",
            extras
        );
    }
}
