// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranking songs against a query code set.
//!
//! The inverted layout means a query only ever looks at songs that share a
//! code with it. Scores come from three counts per candidate (see
//! [`Similarity`]), and the top K survive a bounded heap.

mod query;
mod similarity;

pub use query::*;
pub use similarity::*;
