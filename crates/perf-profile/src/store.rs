// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Profile persistence backends.
//!
//! The on-disk format is irrelevant to the partitioner; it only needs a
//! way to load the whole table at the start of a run and write it back
//! once at the end. [`JsonFileStore`] is the default backend,
//! [`MemoryStore`] keeps everything in process for tests and dry runs.

use crate::{ProfileError, ProfileTable};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable storage for a [`ProfileTable`].
pub trait ProfileStore: Send + Sync {
    /// Loads the stored table, or an empty table if nothing is stored yet.
    fn load(&self) -> Result<ProfileTable, ProfileError>;

    /// Replaces the stored table.
    fn save(&self, table: &ProfileTable) -> Result<(), ProfileError>;
}

/// Stores the table as pretty-printed JSON in a single file.
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

    fn io_error(&self, source: std::io::Error) -> ProfileError {
        ProfileError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<ProfileTable, ProfileError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no profile cache at '{}'", self.path.display());
                return Ok(ProfileTable::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        let table: ProfileTable = serde_json::from_str(&content)?;
        tracing::debug!(
            "loaded {} profiles from '{}'",
            table.num_profiles(),
            self.path.display(),
        );
        Ok(table)
    }

    fn save(&self, table: &ProfileTable) -> Result<(), ProfileError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(table)?;

        // Write a sibling file first so a crash never leaves a torn cache.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        tracing::debug!(
            "saved {} profiles to '{}'",
            table.num_profiles(),
            self.path.display(),
        );
        Ok(())
    }
}

/// In-process store. Counts saves so callers can check write frequency.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<ProfileTable>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `table`.
    pub fn with_table(table: ProfileTable) -> Self {
        Self {
            table: Mutex::new(table),
            saves: Mutex::new(0),
        }
    }

    /// Number of times [`ProfileStore::save`] has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A copy of the currently stored table.
    pub fn snapshot(&self) -> ProfileTable {
        self.table.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<ProfileTable, ProfileError> {
        Ok(self.snapshot())
    }

    fn save(&self, table: &ProfileTable) -> Result<(), ProfileError> {
        *self.table.lock().unwrap_or_else(|e| e.into_inner()) = table.clone();
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
