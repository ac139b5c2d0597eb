// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! One enum per failure kind, so a caller that only builds blocks never has
//! to match on loading errors. [`Error`] folds them all together for code
//! that chains several operations with `?`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::binary::MAX_SONGS_PER_BLOCK;

pub type Result<T> = std::result::Result<T, Error>;

/// A block was asked to hold more songs than a 16-bit song index can address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("an index block cannot contain more than {} songs (got {songs})", MAX_SONGS_PER_BLOCK)]
pub struct CapacityError {
    pub songs: usize,
}

/// A value did not fit the fixed width it was being encoded as.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value {value} does not fit in {bits} bits")]
pub struct EncodeError {
    pub value: u64,
    pub bits: u32,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 in fingerprint: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid deflate stream in fingerprint: {0}")]
    Inflate(#[source] io::Error),

    #[error("fingerprint payload is not ASCII hex")]
    NotAscii,

    #[error("fingerprint code section has {len} hex digits, not a multiple of 5")]
    RaggedPayload { len: usize },

    #[error("invalid hex group {group:?} at payload offset {offset}")]
    InvalidHex { group: String, offset: usize },

    #[error("invalid code {token:?} in code list")]
    InvalidCode { token: String },
}

#[derive(Debug, Error)]
pub enum IndexLoadingError {
    #[error("could not read index block {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed index block {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("an index needs at least one block path")]
    NoBlocks,
}

impl IndexLoadingError {
    /// Path of the block that failed, if the failure is tied to one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Unreadable { path, .. } | Self::Malformed { path, .. } => Some(path),
            Self::NoBlocks => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("load() must be called before querying")]
    NotLoaded,

    #[error("the index has been released")]
    Released,

    #[error("unknown similarity {0:?}; expected one of: jaccard, set_int, set_int_norm_length_first")]
    UnknownSimilarity(String),
}

#[derive(Debug, Error)]
#[error("could not write index block {path}: {source}")]
pub struct IndexWriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Loading(#[from] IndexLoadingError),

    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Write(#[from] IndexWriteError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
