// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query execution: candidates from postings, then top-K by score.
//!
//! # Algorithm
//!
//! 1. Reduce the query to its sorted distinct codes.
//! 2. Per block, walk the query codes and binary-search each one in the
//!    block's code array. The query is sorted, so each search starts where the
//!    previous one ended. Every song in a hit's postings list gets its
//!    intersection count bumped.
//! 3. Score only the songs that were touched, using the block's song lengths.
//! 4. Keep the best K per block in a min-heap, then merge the per-block
//!    winners into the global best K the same way.
//!
//! Songs that share no code with the query are never visited and never
//! returned, so a query may yield fewer than K results.
//!
//! # Ordering
//!
//! Descending score, then ascending global song id. The order is total, so
//! results are identical across runs, thread counts and block splits.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::trace;

use crate::index::{InvertedIndex, LoadedBlock};
use crate::normalize::sorted_distinct;

use super::Similarity;

/// Result count used when the caller does not pick one.
pub const DEFAULT_LIMIT: usize = 10;

/// Per-query settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOptions {
    /// Maximum number of results (K).
    pub limit: usize,
    pub similarity: Similarity,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            similarity: Similarity::default(),
        }
    }
}

impl QueryOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_similarity(mut self, similarity: Similarity) -> Self {
        self.similarity = similarity;
        self
    }
}

/// One ranked song.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryResult {
    /// Global song id: block offset plus local song index.
    pub song_id: usize,
    pub score: f32,
}

/// Total ranking order: higher score first, then lower song id.
pub fn rank_order(a: &QueryResult, b: &QueryResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.song_id.cmp(&b.song_id))
}

impl InvertedIndex {
    /// Rank the songs sharing at least one code with `codes`.
    ///
    /// `codes` may be unsorted and contain duplicates. An empty query or a
    /// zero limit gives an empty result.
    pub fn query(&self, codes: &[u32], options: &QueryOptions) -> Vec<QueryResult> {
        if options.limit == 0 {
            return Vec::new();
        }
        let query = sorted_distinct(codes);
        if query.is_empty() {
            return Vec::new();
        }

        let per_block = |loaded: &LoadedBlock| score_block(loaded, &query, options);

        #[cfg(feature = "parallel")]
        let partial: Vec<Vec<QueryResult>> = self.blocks().par_iter().map(per_block).collect();

        #[cfg(not(feature = "parallel"))]
        let partial: Vec<Vec<QueryResult>> = self.blocks().iter().map(per_block).collect();

        top_k(partial.into_iter().flatten(), options.limit)
    }
}

/// Best `options.limit` songs of one block.
fn score_block(loaded: &LoadedBlock, query: &[u32], options: &QueryOptions) -> Vec<QueryResult> {
    let block = loaded.block();
    let codes = block.codes();

    let mut counts = vec![0u32; block.n_songs()];
    let mut touched: Vec<u16> = Vec::new();

    let mut lo = 0;
    for &code in query {
        if lo >= codes.len() {
            break;
        }
        match codes[lo..].binary_search(&code) {
            Ok(i) => {
                let at = lo + i;
                for &song in block.postings_at(at) {
                    let count = &mut counts[usize::from(song)];
                    if *count == 0 {
                        touched.push(song);
                    }
                    *count += 1;
                }
                lo = at + 1;
            }
            Err(i) => lo += i,
        }
    }

    trace!(
        offset = loaded.offset(),
        candidates = touched.len(),
        "block candidates"
    );

    let query_len = query.len() as u32;
    let song_lengths = block.song_lengths();
    let scored = touched.into_iter().map(|song| {
        let local = usize::from(song);
        QueryResult {
            song_id: loaded.global_id(song),
            score: options
                .similarity
                .score(counts[local], query_len, song_lengths[local]),
        }
    });
    top_k(scored, options.limit)
}

/// Extract the best `k` results using a heap whose top is the worst kept one.
///
/// O(n log k) instead of sorting all n candidates.
fn top_k<I>(results: I, k: usize) -> Vec<QueryResult>
where
    I: IntoIterator<Item = QueryResult>,
{
    struct Ranked(QueryResult);

    impl PartialEq for Ranked {
        fn eq(&self, other: &Self) -> bool {
            self.cmp(other) == Ordering::Equal
        }
    }

    impl Eq for Ranked {}

    impl Ord for Ranked {
        // Better results compare Less, so the max-heap top is the worst
        fn cmp(&self, other: &Self) -> Ordering {
            rank_order(&self.0, &other.0)
        }
    }

    impl PartialOrd for Ranked {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    if k == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Ranked> = BinaryHeap::with_capacity(k.min(1024) + 1);
    for result in results {
        heap.push(Ranked(result));
        if heap.len() > k {
            heap.pop();
        }
    }

    // Ascending by Ord is best first
    heap.into_sorted_vec().into_iter().map(|r| r.0).collect()
}
