// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted index over audio fingerprint codes.
//!
//! A fingerprinter turns a recording into a bag of 32-bit codes. This crate
//! indexes many such bags into compact binary blocks and answers "which known
//! songs look most like this bag?" by walking postings lists instead of
//! comparing against every song.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ fingerprint  │──▶│  normalize  │──▶│    build     │──▶│   binary     │
//! │ (base64 +    │   │ (sorted     │   │ (postings    │   │ (block bytes │
//! │  deflate)    │   │  distinct)  │   │  map, batch) │   │  on disk)    │
//! └──────────────┘   └─────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                │
//!                    ┌─────────────┐   ┌──────────────┐          │
//!                    │   search    │◀──│    index     │◀─────────┘
//!                    │ (candidates,│   │ (blocks with │
//!                    │  top-K)     │   │  offsets,    │
//!                    └─────────────┘   │  lifecycle)  │
//!                                      └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use echodex::{write_index_blocks, IndexHandle, QueryOptions};
//!
//! let songs = vec![vec![17, 4, 99], vec![4, 5, 6]];
//! let paths = write_index_blocks(songs, "songs.idx".as_ref())?;
//!
//! let handle = IndexHandle::open(&paths)?;
//! for hit in handle.query(&[4, 17, 99], &QueryOptions::default())? {
//!     println!("[{}]: {}", hit.song_id, hit.score);
//! }
//! # Ok::<(), echodex::Error>(())
//! ```

pub mod binary;
pub mod build;
pub mod error;
pub mod fingerprint;
pub mod index;
pub mod normalize;
pub mod search;

// Re-exports for public API
pub use binary::{BlockStats, IndexBlock, MAX_SONGS_PER_BLOCK};
pub use build::{
    build_index_block, build_index_block_with, parse_code_line, read_code_lines,
    read_fingerprint_lines, write_index_block, write_index_blocks, write_index_blocks_with,
    BuildOptions,
};
pub use error::{
    CapacityError, DecodeError, EncodeError, Error, IndexLoadingError, IndexWriteError, Result,
    UsageError,
};
pub use fingerprint::{decode_fingerprint, decode_fingerprint_full, decode_fingerprints, Fingerprint};
pub use index::{HandleState, IndexHandle, InvertedIndex, LoadedBlock, SharedIndex};
pub use normalize::{sorted_distinct, sorted_distinct_in_place};
pub use search::{QueryOptions, QueryResult, Similarity, DEFAULT_LIMIT};
