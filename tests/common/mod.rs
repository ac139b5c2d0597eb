//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use echodex::{
    build_index_block, parse_code_line, IndexBlock, InvertedIndex, QueryResult,
};

// ============================================================================
// FIXTURES
// ============================================================================

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

/// A fixture file holding a single CSV line of codes.
pub fn read_csv_fixture(name: &str) -> Vec<u32> {
    parse_code_line(&read_fixture(name)).expect("fixture CSV is valid")
}

/// Songs of `reference_songs.csv`, one per line.
pub fn reference_songs() -> Vec<Vec<u32>> {
    read_fixture("reference_songs.csv")
        .lines()
        .map(|l| parse_code_line(l).expect("fixture CSV is valid"))
        .collect()
}

// ============================================================================
// DATA GENERATION
// ============================================================================

/// Deterministic xorshift generator, so failures reproduce without a seed dump.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x >> 32) as u32
    }

    pub fn below(&mut self, n: u32) -> u32 {
        self.next_u32() % n
    }
}

/// `n` songs of up to `max_len` codes drawn from `0..alphabet`.
pub fn random_songs(seed: u64, n: usize, max_len: u32, alphabet: u32) -> Vec<Vec<u32>> {
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|_| {
            let len = rng.below(max_len) + 1;
            (0..len).map(|_| rng.below(alphabet)).collect()
        })
        .collect()
}

// ============================================================================
// INDEX HELPERS
// ============================================================================

pub fn build_index(songs: &[Vec<u32>]) -> InvertedIndex {
    let bytes = build_index_block(songs).expect("within capacity");
    InvertedIndex::from_blocks([IndexBlock::decode(&bytes).expect("fresh block decodes")])
}

/// Split `songs` into consecutive blocks of the given sizes.
pub fn build_split_index(songs: &[Vec<u32>], sizes: &[usize]) -> InvertedIndex {
    assert_eq!(sizes.iter().sum::<usize>(), songs.len());
    let mut start = 0;
    let blocks = sizes.iter().map(|&size| {
        let chunk = &songs[start..start + size];
        start += size;
        IndexBlock::decode(&build_index_block(chunk).unwrap()).unwrap()
    });
    InvertedIndex::from_blocks(blocks.collect::<Vec<_>>())
}

// ============================================================================
// REFERENCE ORACLE
// ============================================================================

/// Jaccard over explicit sets, computed the slow way.
pub fn jaccard_ref(a: &[u32], b: &[u32]) -> f32 {
    let a: BTreeSet<u32> = a.iter().copied().collect();
    let b: BTreeSet<u32> = b.iter().copied().collect();
    let inter = a.intersection(&b).count();
    let union = a.union(&b).count();
    if union == 0 {
        0.0
    } else {
        inter as f32 / union as f32
    }
}

/// Brute-force ranking: score every song sharing a code, sort, truncate.
pub fn brute_force_query(songs: &[Vec<u32>], query: &[u32], k: usize) -> Vec<QueryResult> {
    let q: BTreeSet<u32> = query.iter().copied().collect();
    let mut results: Vec<QueryResult> = songs
        .iter()
        .enumerate()
        .filter(|(_, s)| s.iter().any(|c| q.contains(c)))
        .map(|(i, s)| QueryResult {
            song_id: i,
            score: jaccard_ref(query, s),
        })
        .collect();
    results.sort_by(echodex::search::rank_order);
    results.truncate(k);
    results
}

pub fn ids(results: &[QueryResult]) -> Vec<usize> {
    results.iter().map(|r| r.song_id).collect()
}
