// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Several blocks composed into one logical index.
//!
//! Blocks keep their local song indices. The index assigns each block an
//! offset equal to the number of songs in all blocks before it, so the
//! global id of local song `s` in block `b` is `offset(b) + s`. Block order
//! is the order the caller listed the paths in.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::binary::IndexBlock;
use crate::error::IndexLoadingError;

/// A block plus the global id of its first song.
#[derive(Debug, Clone)]
pub struct LoadedBlock {
    block: IndexBlock,
    offset: usize,
    path: Option<PathBuf>,
}

impl LoadedBlock {
    pub fn block(&self) -> &IndexBlock {
        &self.block
    }

    /// Global id of local song 0.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// File the block was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Global id of a local song index.
    #[inline]
    pub fn global_id(&self, local: u16) -> usize {
        self.offset + usize::from(local)
    }
}

/// An immutable, queryable index over one or more blocks.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    blocks: Vec<LoadedBlock>,
    song_count: usize,
}

impl InvertedIndex {
    /// Read and validate every block, in order.
    ///
    /// Stops at the first path that cannot be read or decoded; nothing
    /// loaded before it is kept.
    pub fn load_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, IndexLoadingError> {
        if paths.is_empty() {
            return Err(IndexLoadingError::NoBlocks);
        }

        let mut index = Self::default();
        for path in paths {
            let path = path.as_ref();
            let bytes = fs::read(path).map_err(|source| IndexLoadingError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;
            let block = IndexBlock::decode(&bytes).map_err(|source| {
                IndexLoadingError::Malformed {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            debug!(
                path = %path.display(),
                codes = block.n_codes(),
                songs = block.n_songs(),
                offset = index.song_count,
                "loaded index block"
            );
            index.push(block, Some(path.to_path_buf()));
        }

        info!(
            blocks = index.blocks.len(),
            songs = index.song_count,
            "inverted index loaded"
        );
        Ok(index)
    }

    /// Compose already-decoded blocks, numbering songs in block order.
    pub fn from_blocks<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = IndexBlock>,
    {
        let mut index = Self::default();
        for block in blocks {
            index.push(block, None);
        }
        index
    }

    fn push(&mut self, block: IndexBlock, path: Option<PathBuf>) {
        let offset = self.song_count;
        self.song_count += block.n_songs();
        self.blocks.push(LoadedBlock {
            block,
            offset,
            path,
        });
    }

    /// Total songs across all blocks.
    pub fn song_count(&self) -> usize {
        self.song_count
    }

    pub fn blocks(&self) -> &[LoadedBlock] {
        &self.blocks
    }

    /// Distinct-code count of a song by global id.
    pub fn song_length(&self, song_id: usize) -> Option<u32> {
        let b = self.block_of(song_id)?;
        b.block.song_length(song_id - b.offset)
    }

    /// The block holding a global song id.
    pub fn block_of(&self, song_id: usize) -> Option<&LoadedBlock> {
        if song_id >= self.song_count {
            return None;
        }
        // Offsets are ascending; find the last block starting at or before song_id
        let i = self.blocks.partition_point(|b| b.offset <= song_id);
        self.blocks[..i]
            .iter()
            .rev()
            .find(|b| song_id < b.offset + b.block.n_songs())
    }
}
