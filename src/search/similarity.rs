// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Similarity functions between a query code set and a song code set.
//!
//! Every function only needs three counts: the query size `q`, the song size
//! `s` (read from the block's song lengths), and the intersection size `i`
//! accumulated from postings lists. No song's full code list is ever touched.

use std::fmt;
use std::str::FromStr;

use crate::error::UsageError;

/// How a candidate song is scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Similarity {
    /// `i / (q + s - i)`, in `[0, 1]`. 1 means identical sets.
    #[default]
    Jaccard,
    /// `i`, the raw number of shared codes.
    SetIntersection,
    /// `i / q`, the fraction of the query found in the song.
    SetIntersectionNormQuery,
}

impl Similarity {
    pub const ALL: [Similarity; 3] = [
        Similarity::Jaccard,
        Similarity::SetIntersection,
        Similarity::SetIntersectionNormQuery,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Jaccard => "jaccard",
            Self::SetIntersection => "set_int",
            Self::SetIntersectionNormQuery => "set_int_norm_length_first",
        }
    }

    /// Score from intersection, query and song sizes.
    ///
    /// Returns 0 when the denominator is 0 (empty query and empty song).
    #[inline]
    pub fn score(self, intersection: u32, query_len: u32, song_len: u32) -> f32 {
        let i = u64::from(intersection);
        let den = match self {
            Self::Jaccard => (u64::from(query_len) + u64::from(song_len)).saturating_sub(i),
            Self::SetIntersection => return intersection as f32,
            Self::SetIntersectionNormQuery => u64::from(query_len),
        };
        if den == 0 {
            0.0
        } else {
            i as f32 / den as f32
        }
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Similarity {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|sim| sim.name() == wanted)
            .ok_or_else(|| UsageError::UnknownSimilarity(s.to_string()))
    }
}
