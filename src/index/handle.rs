// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index lifecycle: unloaded, loaded, released.
//!
//! An [`IndexHandle`] remembers which block paths it serves and owns the
//! loaded index, if any. Queries are only legal while loaded; everything
//! else reports a [`UsageError`] instead of panicking.
//!
//! ```text
//!            load() ok
//! Unloaded ───────────▶ Loaded
//!    ▲  │                 │
//!    │  │ release()       │ release()
//!    │  ▼                 ▼
//!    │ Released ◀─────────┘
//!    │  │
//!    └──┘ load() (ok → Loaded, error → Unloaded)
//! ```
//!
//! A failed `load()` always leaves the handle unloaded, even if it was
//! loaded before, so a query can never see a half-replaced index.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{IndexLoadingError, UsageError};
use crate::search::{QueryOptions, QueryResult};

use super::InvertedIndex;

/// Observable lifecycle state of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Unloaded,
    Loaded,
    Released,
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unloaded => "unloaded",
            Self::Loaded => "loaded",
            Self::Released => "released",
        })
    }
}

#[derive(Debug)]
enum State {
    Unloaded,
    Loaded(InvertedIndex),
    Released,
}

/// Owner of an index's paths and, once loaded, of its in-memory blocks.
#[derive(Debug)]
pub struct IndexHandle {
    paths: Vec<PathBuf>,
    state: State,
}

impl IndexHandle {
    /// A handle over `paths`, not yet loaded.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
            state: State::Unloaded,
        }
    }

    /// Create and load in one step.
    pub fn open<I, P>(paths: I) -> Result<Self, IndexLoadingError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut handle = Self::new(paths);
        handle.load()?;
        Ok(handle)
    }

    /// Wrap an index that is already in memory.
    pub fn from_index(index: InvertedIndex) -> Self {
        let paths = index
            .blocks()
            .iter()
            .filter_map(|b| b.path().map(Path::to_path_buf))
            .collect();
        Self {
            paths,
            state: State::Loaded(index),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn state(&self) -> HandleState {
        match self.state {
            State::Unloaded => HandleState::Unloaded,
            State::Loaded(_) => HandleState::Loaded,
            State::Released => HandleState::Released,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded(_))
    }

    /// (Re)load every block from disk.
    ///
    /// Legal in any state. Any previously loaded index is dropped first.
    pub fn load(&mut self) -> Result<(), IndexLoadingError> {
        self.state = State::Unloaded;
        match InvertedIndex::load_from_paths(&self.paths) {
            Ok(index) => {
                self.state = State::Loaded(index);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "index load failed");
                Err(e)
            }
        }
    }

    /// Free the loaded index. Safe to call in any state, any number of times.
    pub fn release(&mut self) {
        if let State::Loaded(index) = &self.state {
            debug!(songs = index.song_count(), "releasing index");
        }
        self.state = State::Released;
    }

    /// The loaded index, or why there is none.
    pub fn index(&self) -> Result<&InvertedIndex, UsageError> {
        match &self.state {
            State::Loaded(index) => Ok(index),
            State::Unloaded => Err(UsageError::NotLoaded),
            State::Released => Err(UsageError::Released),
        }
    }

    pub fn song_count(&self) -> Result<usize, UsageError> {
        self.index().map(InvertedIndex::song_count)
    }

    /// Rank songs against `codes`. See [`InvertedIndex::query`].
    pub fn query(
        &self,
        codes: &[u32],
        options: &QueryOptions,
    ) -> Result<Vec<QueryResult>, UsageError> {
        let index = self.index().map_err(|e| {
            warn!(state = %self.state(), "query on an index that is not loaded");
            e
        })?;
        Ok(index.query(codes, options))
    }
}

impl Drop for IndexHandle {
    fn drop(&mut self) {
        self.release();
    }
}
