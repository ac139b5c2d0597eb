// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Loading blocks into a queryable index.
//!
//! - [`InvertedIndex`]: immutable blocks with global song numbering
//! - [`IndexHandle`]: the unloaded/loaded/released lifecycle around it
//! - [`SharedIndex`]: the same handle behind a read-write lock

mod handle;
mod inverted;
mod shared;

pub use handle::*;
pub use inverted::*;
pub use shared::*;
