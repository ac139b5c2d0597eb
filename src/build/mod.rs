// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction.
//!
//! - [`block`]: code sequences to one in-memory block and its bytes
//! - [`batch`]: blocks on disk, with automatic splitting past the song limit
//! - [`input`]: one-song-per-line text inputs (CSV codes or fingerprints)

pub mod batch;
pub mod block;
pub mod input;

pub use batch::{batch_path, write_index_block, write_index_blocks, write_index_blocks_with};
pub use block::{build_index_block, build_index_block_with, BuildOptions};
pub use input::{parse_code_line, read_code_lines, read_fingerprint_lines, CodeLines};
