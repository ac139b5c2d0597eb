// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Single-block inverted index construction.
//!
//! One pass over the songs in caller order. Every song is reduced to its
//! sorted distinct codes, then appended to the postings list of each of its
//! codes. Because songs are visited in ascending index order, every postings
//! list comes out ascending without a sort.
//!
//! The postings map is a `BTreeMap`, so walking it yields the codes already
//! in the ascending order the block format wants.

use std::borrow::Cow;
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::binary::{IndexBlock, MAX_SONGS_PER_BLOCK};
use crate::error::CapacityError;
use crate::normalize::{is_sorted_distinct, sorted_distinct};

/// Knobs for block construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Skip the per-song sort for sequences that are already strictly
    /// ascending. Sequences that are not get normalized anyway.
    pub assume_sorted_distinct: bool,
}

/// Build one block from per-song code sequences and serialize it.
///
/// The position of a sequence in `songs` becomes its song index.
pub fn build_index_block<S>(songs: &[S]) -> Result<Vec<u8>, CapacityError>
where
    S: AsRef<[u32]> + Sync,
{
    build_index_block_with(songs, &BuildOptions::default())
}

/// [`build_index_block`] with explicit options.
pub fn build_index_block_with<S>(
    songs: &[S],
    options: &BuildOptions,
) -> Result<Vec<u8>, CapacityError>
where
    S: AsRef<[u32]> + Sync,
{
    Ok(IndexBlock::from_code_sequences(songs, options)?.encode())
}

impl IndexBlock {
    /// Build an in-memory block from per-song code sequences.
    ///
    /// Fails before doing any work if `songs` holds more than
    /// [`MAX_SONGS_PER_BLOCK`] sequences.
    pub fn from_code_sequences<S>(
        songs: &[S],
        options: &BuildOptions,
    ) -> Result<Self, CapacityError>
    where
        S: AsRef<[u32]> + Sync,
    {
        if songs.len() > MAX_SONGS_PER_BLOCK {
            return Err(CapacityError { songs: songs.len() });
        }

        let normalized = normalize_songs(songs, options);

        let mut postings: BTreeMap<u32, Vec<u16>> = BTreeMap::new();
        let mut song_lengths = Vec::with_capacity(normalized.len());
        for (song, codes) in normalized.iter().enumerate() {
            // Fits: song < MAX_SONGS_PER_BLOCK = u16::MAX
            let song = song as u16;
            song_lengths.push(codes.len() as u32);
            for &code in codes.iter() {
                postings.entry(code).or_default().push(song);
            }
        }

        let total_postings: usize = postings.values().map(Vec::len).sum();
        let mut codes = Vec::with_capacity(postings.len());
        let mut postings_lengths = Vec::with_capacity(postings.len());
        let mut song_indices = Vec::with_capacity(total_postings);
        for (code, list) in postings {
            codes.push(code);
            postings_lengths.push(list.len() as u32);
            song_indices.extend_from_slice(&list);
        }

        Ok(IndexBlock::from_parts(
            codes,
            postings_lengths,
            song_lengths,
            song_indices,
        ))
    }
}

fn normalize_songs<'a, S>(songs: &'a [S], options: &BuildOptions) -> Vec<Cow<'a, [u32]>>
where
    S: AsRef<[u32]> + Sync,
{
    let normalize_one = |song: &'a S| -> Cow<'a, [u32]> {
        let codes = song.as_ref();
        // A linear check keeps a wrong hint from producing an unreadable block
        if options.assume_sorted_distinct && is_sorted_distinct(codes) {
            Cow::Borrowed(codes)
        } else {
            Cow::Owned(sorted_distinct(codes))
        }
    };

    #[cfg(feature = "parallel")]
    {
        songs.par_iter().map(normalize_one).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        songs.iter().map(normalize_one).collect()
    }
}
