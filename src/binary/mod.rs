// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for index blocks.
//!
//! A block is a memory dump of five arrays, all little-endian and unsigned.
//! No compression, no padding, no footer. The point is that loading is a few
//! bulk reads and that any tool that understood the original dump format
//! still reads ours byte-for-byte.
//!
//! Song indices are u16, which caps a block at 65 535 songs. Bigger
//! collections are split into several blocks and loaded together; the order
//! of the block paths decides the global song numbering.
//!
//! # Security Considerations
//!
//! Blocks may come from anywhere, so decoding never trusts the header:
//! - Section sizes are computed in u64 and checked against the real length
//!   before anything is allocated
//! - The sections must add up to exactly the block length
//! - Codes must be strictly ascending (binary search depends on it)
//! - Song indices must be in range and song lengths must match the postings
//!
//! # Format Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (8 bytes)                                           │
//! │   n_codes: u32                                             │
//! │   n_songs: u32                                             │
//! ├────────────────────────────────────────────────────────────┤
//! │ CODES              u32[n_codes]   strictly ascending       │
//! ├────────────────────────────────────────────────────────────┤
//! │ POSTINGS_LENGTHS   u32[n_codes]   parallel to CODES        │
//! ├────────────────────────────────────────────────────────────┤
//! │ SONG_LENGTHS       u32[n_songs]   distinct codes per song  │
//! ├────────────────────────────────────────────────────────────┤
//! │ SONG_INDICES       u16[sum(POSTINGS_LENGTHS)]              │
//! │   one ascending postings list per code, in code order      │
//! └────────────────────────────────────────────────────────────┘
//! ```

// Submodules
mod block;
mod encoding;
mod header;

// Re-export from submodules for public API
pub use block::{BlockStats, IndexBlock};
pub use encoding::{
    encode_u16, encode_u16_slice, encode_u32, encode_u32_slice, encode_u64, encode_u64_slice,
    put_u16, put_u16s, put_u32, put_u32s, put_u64, ByteReader,
};
pub use header::{
    block_crc32, BlockHeader, BlockLayout, CODE_WIDTH, MAX_SONGS_PER_BLOCK, SONG_INDEX_WIDTH,
};
