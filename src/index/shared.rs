// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A handle that many threads can query while one of them reloads.
//!
//! Queries share a read lock, so they run concurrently. `load` and `release`
//! take the write lock and wait for in-flight queries to finish, which is
//! exactly the ordering a bare [`IndexHandle`] leaves to its caller.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{IndexLoadingError, UsageError};
use crate::search::{QueryOptions, QueryResult};

use super::{HandleState, IndexHandle, InvertedIndex};

/// Cloneable, thread-safe [`IndexHandle`].
#[derive(Debug, Clone)]
pub struct SharedIndex {
    inner: Arc<RwLock<IndexHandle>>,
}

impl SharedIndex {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self::from_handle(IndexHandle::new(paths))
    }

    pub fn from_handle(handle: IndexHandle) -> Self {
        Self {
            inner: Arc::new(RwLock::new(handle)),
        }
    }

    pub fn load(&self) -> Result<(), IndexLoadingError> {
        self.inner.write().load()
    }

    pub fn release(&self) {
        self.inner.write().release();
    }

    pub fn state(&self) -> HandleState {
        self.inner.read().state()
    }

    pub fn song_count(&self) -> Result<usize, UsageError> {
        self.inner.read().song_count()
    }

    pub fn query(
        &self,
        codes: &[u32],
        options: &QueryOptions,
    ) -> Result<Vec<QueryResult>, UsageError> {
        self.inner.read().query(codes, options)
    }

    /// Run `f` against the loaded index while holding the read lock.
    ///
    /// The lock is released when `f` returns or unwinds.
    pub fn with_index<T, F>(&self, f: F) -> Result<T, UsageError>
    where
        F: FnOnce(&InvertedIndex) -> T,
    {
        let guard = self.inner.read();
        let index = guard.index()?;
        Ok(f(index))
    }
}
