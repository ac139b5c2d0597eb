// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! One inverted index block, in memory and on disk.
//!
//! A block maps every distinct code to the songs that contain it. On disk it
//! is five flat arrays (see the module docs of [`crate::binary`]); in memory
//! it is the same arrays plus a prefix sum over the postings lengths, so the
//! postings list of the i-th code is a slice lookup instead of a scan.
//!
//! # INVARIANTS (checked by `decode`)
//!
//! 1. **CODES_ASCENDING**: `codes` is strictly ascending
//! 2. **POSTINGS_ASCENDING**: each postings list is strictly ascending
//! 3. **SONG_IN_RANGE**: every song index is `< n_songs`
//! 4. **SONG_LENGTH_CONSISTENT**: `song_lengths[s]` equals the number of
//!    postings lists that contain `s`
//! 5. **EXACT_SIZE**: the sections add up to exactly the input length

use std::io::{self, Write};

use super::encoding::{put_u16s, put_u32s, ByteReader};
use super::header::{BlockHeader, MAX_SONGS_PER_BLOCK};

/// A decoded (or freshly built) index block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBlock {
    codes: Vec<u32>,
    postings_lengths: Vec<u32>,
    song_lengths: Vec<u32>,
    song_indices: Vec<u16>,
    /// `postings_offsets[i]..postings_offsets[i + 1]` is the i-th postings list
    postings_offsets: Vec<usize>,
}

/// Summary numbers for tooling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStats {
    pub n_codes: usize,
    pub n_songs: usize,
    pub total_postings: usize,
    pub longest_postings: usize,
    pub mean_song_length: f64,
    pub size_bytes: usize,
}

impl IndexBlock {
    /// Assemble a block from already-consistent parts.
    ///
    /// Only the builder calls this; it upholds the invariants by construction.
    pub(crate) fn from_parts(
        codes: Vec<u32>,
        postings_lengths: Vec<u32>,
        song_lengths: Vec<u32>,
        song_indices: Vec<u16>,
    ) -> Self {
        debug_assert_eq!(codes.len(), postings_lengths.len());
        let postings_offsets = prefix_offsets(&postings_lengths);
        debug_assert_eq!(postings_offsets.last().copied(), Some(song_indices.len()));
        Self {
            codes,
            postings_lengths,
            song_lengths,
            song_indices,
            postings_offsets,
        }
    }

    pub fn n_codes(&self) -> usize {
        self.codes.len()
    }

    pub fn n_songs(&self) -> usize {
        self.song_lengths.len()
    }

    /// Sorted distinct codes.
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    pub fn postings_lengths(&self) -> &[u32] {
        &self.postings_lengths
    }

    /// Distinct-code count of every song, in song order.
    pub fn song_lengths(&self) -> &[u32] {
        &self.song_lengths
    }

    /// All postings lists concatenated in code order.
    pub fn song_indices(&self) -> &[u16] {
        &self.song_indices
    }

    /// Distinct-code count of one song.
    #[inline]
    pub fn song_length(&self, song: usize) -> Option<u32> {
        self.song_lengths.get(song).copied()
    }

    /// Postings list of the code at position `i` of [`Self::codes`].
    #[inline]
    pub fn postings_at(&self, i: usize) -> &[u16] {
        &self.song_indices[self.postings_offsets[i]..self.postings_offsets[i + 1]]
    }

    /// Postings list of `code`, found by binary search over the code array.
    #[inline]
    pub fn postings(&self, code: u32) -> Option<&[u16]> {
        self.codes
            .binary_search(&code)
            .ok()
            .map(|i| self.postings_at(i))
    }

    /// Iterate `(code, postings)` pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u16])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .map(move |(i, &code)| (code, self.postings_at(i)))
    }

    /// Size of the serialized block in bytes.
    pub fn encoded_len(&self) -> usize {
        BlockHeader::SIZE
            + 4 * (self.codes.len() + self.postings_lengths.len() + self.song_lengths.len())
            + 2 * self.song_indices.len()
    }

    pub fn stats(&self) -> BlockStats {
        let total_codes: u64 = self.song_lengths.iter().map(|&l| u64::from(l)).sum();
        BlockStats {
            n_codes: self.n_codes(),
            n_songs: self.n_songs(),
            total_postings: self.song_indices.len(),
            longest_postings: self.postings_lengths.iter().max().copied().unwrap_or(0) as usize,
            mean_song_length: if self.song_lengths.is_empty() {
                0.0
            } else {
                total_codes as f64 / self.song_lengths.len() as f64
            },
            size_bytes: self.encoded_len(),
        }
    }

    // ========================================================================
    // ENCODING
    // ========================================================================

    /// Serialize the block.
    ///
    /// ```text
    /// u32 n_codes
    /// u32 n_songs
    /// u32[n_codes]  codes              (ascending)
    /// u32[n_codes]  postings_lengths
    /// u32[n_songs]  song_lengths
    /// u16[..]       song_indices       (postings lists in code order)
    /// ```
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        let header = self.header();
        put_u32s(&[header.n_codes, header.n_songs], buf);
        put_u32s(&self.codes, buf);
        put_u32s(&self.postings_lengths, buf);
        put_u32s(&self.song_lengths, buf);
        put_u16s(&self.song_indices, buf);
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.encode())
    }

    fn header(&self) -> BlockHeader {
        // Both counts are bounded: songs by MAX_SONGS_PER_BLOCK, codes by the u32 code space
        BlockHeader {
            n_codes: self.codes.len() as u32,
            n_songs: self.song_lengths.len() as u32,
        }
    }

    // ========================================================================
    // DECODING
    // ========================================================================

    /// Parse and validate a serialized block.
    pub fn decode(bytes: &[u8]) -> io::Result<Self> {
        let header = BlockHeader::read(&mut &bytes[..])?;
        let layout = header.layout();

        // Reject impossible headers before allocating anything
        if !layout.fits(bytes.len()) {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Header declares {} codes and {} songs, needing at least {} bytes, but block has {}",
                    header.n_codes,
                    header.n_songs,
                    layout.fixed_size(),
                    bytes.len()
                ),
            ));
        }
        if header.n_songs as usize > MAX_SONGS_PER_BLOCK {
            return Err(invalid(format!(
                "Song count {} exceeds block limit {}",
                header.n_songs, MAX_SONGS_PER_BLOCK
            )));
        }

        let n_codes = header.n_codes as usize;
        let n_songs = header.n_songs as usize;

        let mut r = ByteReader::new(bytes);
        r.read_u32_vec(2, "header")?;
        let codes = r.read_u32_vec(n_codes, "codes")?;
        let postings_lengths = r.read_u32_vec(n_codes, "postings lengths")?;
        let song_lengths = r.read_u32_vec(n_songs, "song lengths")?;

        let total_postings: u64 = postings_lengths.iter().map(|&l| u64::from(l)).sum();
        let expected = layout.with_postings(total_postings).total_size();
        if expected != bytes.len() as u64 {
            let kind = if expected > bytes.len() as u64 {
                io::ErrorKind::UnexpectedEof
            } else {
                io::ErrorKind::InvalidData
            };
            return Err(io::Error::new(
                kind,
                format!(
                    "Block size mismatch: sections need {} bytes, block has {}",
                    expected,
                    bytes.len()
                ),
            ));
        }

        let song_indices = r.read_u16_vec(total_postings as usize, "song indices")?;
        debug_assert!(r.is_empty());

        let block = Self {
            postings_offsets: prefix_offsets(&postings_lengths),
            codes,
            postings_lengths,
            song_lengths,
            song_indices,
        };
        block.validate()?;
        Ok(block)
    }

    fn validate(&self) -> io::Result<()> {
        // INVARIANT: CODES_ASCENDING
        if let Some(i) = self.codes.windows(2).position(|w| w[0] >= w[1]) {
            return Err(invalid(format!(
                "Codes not strictly ascending at position {} ({} then {})",
                i + 1,
                self.codes[i],
                self.codes[i + 1]
            )));
        }

        let n_songs = self.n_songs();
        let mut seen = vec![0u32; n_songs];

        for (code, postings) in self.iter() {
            // INVARIANT: POSTINGS_ASCENDING
            if postings.windows(2).any(|w| w[0] >= w[1]) {
                return Err(invalid(format!(
                    "Postings list of code {} is not strictly ascending",
                    code
                )));
            }
            for &song in postings {
                // INVARIANT: SONG_IN_RANGE
                let slot = seen.get_mut(song as usize).ok_or_else(|| {
                    invalid(format!(
                        "Postings list of code {} references song {} of {}",
                        code, song, n_songs
                    ))
                })?;
                *slot += 1;
            }
        }

        // INVARIANT: SONG_LENGTH_CONSISTENT
        if let Some(song) = (0..n_songs).find(|&s| seen[s] != self.song_lengths[s]) {
            return Err(invalid(format!(
                "Song {} declares {} codes but appears in {} postings lists",
                song, self.song_lengths[song], seen[song]
            )));
        }

        Ok(())
    }
}

fn prefix_offsets(lengths: &[u32]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lengths.len() + 1);
    let mut acc = 0usize;
    offsets.push(acc);
    for &len in lengths {
        acc += len as usize;
        offsets.push(acc);
    }
    offsets
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}
