//! Durable key-value storage backing the client.
//!
//! Each key maps to one pretty-printed JSON document at `<data_dir>/<key>.json`.
//! This is the device-local store used for the auth token, the session's role
//! selection, and (under the local backend) the ledger collections themselves.
//!
//! Reads distinguish "absent" from "unreadable": a missing file is `Ok(None)`,
//! while an IO or parse failure is an error the caller can either surface or
//! tolerate, depending on how precious the document is.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{GatewayError, Result};

/// File-per-key JSON storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct ClientStorage {
    /// Directory the documents live in.
    dir: PathBuf,
}

impl ClientStorage {
    /// Creates a handle rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads and parses the document stored under `key`.
    ///
    /// Returns `Ok(None)` when no document exists. A document that exists
    /// but cannot be read or parsed is an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)
            .map_err(|e| GatewayError::Serialization(format!("{}: {e}", path.display())))?;
        Ok(Some(value))
    }

    /// Writes `value` as the document under `key`, replacing any previous
    /// document. Creates the data directory if needed.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let path = self.path_for(key);
        let file = File::create(&path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, value)?;

        debug!(key, path = %path.display(), "wrote storage document");
        Ok(())
    }

    /// Deletes the document under `key`. Removing an absent key is not an
    /// error.
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(key, "removed storage document");
        }
        Ok(())
    }

    /// Returns true if a document exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}
