// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Block header and section layout.
//!
//! The header is 8 bytes: the distinct-code count and the song count. Those
//! two numbers plus the sum of the postings lengths pin down where every
//! section lives, which is what [`BlockLayout`] computes. There is no magic,
//! version or checksum; the format is a plain dump that older tooling reads
//! byte-for-byte, so the only integrity check is that the sections add up to
//! exactly the file length.
//!
//! `BlockLayout` is the single source of truth for section offsets. The
//! encoder and the decoder both go through it.

use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Largest number of songs a block can hold. Song indices are stored as u16.
pub const MAX_SONGS_PER_BLOCK: usize = u16::MAX as usize;

/// Width of each entry in the u32 sections.
pub const CODE_WIDTH: usize = 4;

/// Width of each postings entry.
pub const SONG_INDEX_WIDTH: usize = 2;

// ============================================================================
// HEADER
// ============================================================================

/// Block header (8 bytes fixed size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub n_codes: u32,
    pub n_songs: u32,
}

impl BlockHeader {
    // 2 * u32
    pub const SIZE: usize = 8;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.n_codes.to_le_bytes())?;
        w.write_all(&self.n_songs.to_le_bytes())?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        r.read_exact(&mut buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                io::Error::new(io::ErrorKind::UnexpectedEof, "Block too short for header")
            } else {
                e
            }
        })?;

        Ok(Self {
            n_codes: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            n_songs: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    /// Byte offsets of the fixed-size sections (everything but postings).
    ///
    /// Postings length depends on the postings-lengths array, so the caller
    /// completes the layout with [`BlockLayout::with_postings`].
    pub fn layout(&self) -> BlockLayout {
        BlockLayout::from_header(self)
    }
}

// ============================================================================
// SECTION LAYOUT (SINGLE SOURCE OF TRUTH)
// ============================================================================

/// Section byte offsets inside one block.
///
/// Offsets are computed in u64 so a hostile header cannot overflow them on
/// 32-bit targets; [`BlockLayout::fits`] compares them against the real
/// buffer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub codes: (u64, u64),
    pub postings_lengths: (u64, u64),
    pub song_lengths: (u64, u64),
    pub song_indices: (u64, u64),
}

impl BlockLayout {
    /// Layout order:
    /// 1. HEADER            [8B]
    /// 2. CODES             [n_codes * 4]
    /// 3. POSTINGS_LENGTHS  [n_codes * 4]
    /// 4. SONG_LENGTHS      [n_songs * 4]
    /// 5. SONG_INDICES      [sum(postings_lengths) * 2], empty until known
    pub fn from_header(h: &BlockHeader) -> Self {
        let mut pos = BlockHeader::SIZE as u64;
        let code_bytes = u64::from(h.n_codes) * CODE_WIDTH as u64;
        let song_bytes = u64::from(h.n_songs) * CODE_WIDTH as u64;

        let codes = (pos, pos + code_bytes);
        pos += code_bytes;

        let postings_lengths = (pos, pos + code_bytes);
        pos += code_bytes;

        let song_lengths = (pos, pos + song_bytes);
        pos += song_bytes;

        Self {
            codes,
            postings_lengths,
            song_lengths,
            song_indices: (pos, pos),
        }
    }

    /// Complete the layout once the total number of postings entries is known.
    pub fn with_postings(mut self, total_postings: u64) -> Self {
        let start = self.song_indices.0;
        self.song_indices = (start, start + total_postings * SONG_INDEX_WIDTH as u64);
        self
    }

    /// Offset where the song-lengths section ends (the header-described prefix).
    pub fn fixed_size(&self) -> u64 {
        self.song_lengths.1
    }

    /// Total block size in bytes.
    pub fn total_size(&self) -> u64 {
        self.song_indices.1
    }

    /// Whether a buffer of `len` bytes can hold the fixed-size sections.
    pub fn fits(&self, len: usize) -> bool {
        self.fixed_size() <= len as u64
    }

    /// Get a slice for a section from the bytes
    #[inline]
    pub fn slice<'a>(&self, bytes: &'a [u8], section: (u64, u64)) -> Option<&'a [u8]> {
        let start = usize::try_from(section.0).ok()?;
        let end = usize::try_from(section.1).ok()?;
        bytes.get(start..end)
    }
}

/// CRC32 over a whole block, used as a content fingerprint by tooling.
pub fn block_crc32(data: &[u8]) -> u32 {
    let mut hasher = Crc32Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
