//! Storage port for durable identity persistence.
//!
//! The identity store persists three string keys across restarts. The
//! original deployment used the browser's ambient key-value storage; this
//! module abstracts that behind [`StorageBackend`] so the session logic is
//! storage-agnostic and testable with an in-memory fake.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde_json::{from_reader, to_writer_pretty};

use crate::error::{Error, Result};

/// A string-keyed durable storage port.
pub trait StorageBackend {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`. Deleting an absent key is not
    /// an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory storage backend.
///
/// Nothing survives the process; intended for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed storage persisting a flat JSON string map.
///
/// The whole map is rewritten on every mutation; it only ever holds a
/// handful of identity keys.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Opens the store at `path`, reading any existing contents. A missing
    /// file is an empty store; it is created on first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let file =
                File::open(&path).map_err(|err| Error::io("failed to open storage file", err))?;
            let reader = BufReader::new(file);
            from_reader(reader).map_err(|err| {
                Error::serialization("failed to parse storage file", Some(Box::new(err)))
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let file = File::create(&self.path)
            .map_err(|err| Error::io("failed to create storage file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &self.entries)
            .map_err(|err| Error::serialization("failed to write storage file", Some(Box::new(err))))
    }
}

impl StorageBackend for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
