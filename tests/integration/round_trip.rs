//! Build → write → load → query, with every song querying itself.

use super::common::{brute_force_query, ids, random_songs};
use echodex::{
    sorted_distinct, write_index_blocks, IndexHandle, QueryOptions, Similarity,
};
use tempfile::TempDir;

// ============================================================================
// SELF QUERY
// ============================================================================

#[test]
fn test_every_song_finds_itself_first() {
    let songs = random_songs(7, 300, 40, 5_000);
    let dir = TempDir::new().unwrap();
    let paths = write_index_blocks(songs.clone(), &dir.path().join("songs.idx")).unwrap();

    let handle = IndexHandle::open(&paths).unwrap();
    assert_eq!(handle.song_count().unwrap(), songs.len());

    for (i, song) in songs.iter().enumerate() {
        let results = handle.query(song, &QueryOptions::default()).unwrap();
        let top = results[0];
        assert_eq!(top.score, 1.0, "song {} should match itself exactly", i);
        // A duplicate set would tie at 1.0 and win only if it has a lower id
        let first_exact = songs
            .iter()
            .position(|s| sorted_distinct(s) == sorted_distinct(song))
            .unwrap();
        assert_eq!(top.song_id, first_exact);
    }
}

#[test]
fn test_self_query_order_and_duplicates_do_not_matter() {
    let songs = vec![vec![10, 20, 30, 40], vec![40, 50], vec![60]];
    let dir = TempDir::new().unwrap();
    let paths = write_index_blocks(songs, &dir.path().join("s.idx")).unwrap();
    let handle = IndexHandle::open(&paths).unwrap();

    let shuffled = handle
        .query(&[40, 10, 40, 30, 20, 20], &QueryOptions::default())
        .unwrap();
    assert_eq!(ids(&shuffled), vec![0, 1]);
    assert_eq!(shuffled[0].score, 1.0);
    assert_eq!(shuffled[1].score, 0.2);
}

// ============================================================================
// ORACLE AGREEMENT
// ============================================================================

#[test]
fn test_matches_brute_force_jaccard() {
    let songs = random_songs(99, 500, 25, 400);
    let queries = random_songs(1234, 40, 30, 400);

    let dir = TempDir::new().unwrap();
    let paths = write_index_blocks(songs.clone(), &dir.path().join("o.idx")).unwrap();
    let handle = IndexHandle::open(&paths).unwrap();

    for query in &queries {
        for k in [1, 5, 50] {
            let got = handle
                .query(query, &QueryOptions::default().with_limit(k))
                .unwrap();
            assert_eq!(got, brute_force_query(&songs, query, k));
        }
    }
}

#[test]
fn test_norm_query_similarity_counts_query_coverage() {
    let songs = vec![(0..100).collect::<Vec<u32>>(), vec![1, 2]];
    let dir = TempDir::new().unwrap();
    let paths = write_index_blocks(songs, &dir.path().join("n.idx")).unwrap();
    let handle = IndexHandle::open(&paths).unwrap();

    let options = QueryOptions::default().with_similarity(Similarity::SetIntersectionNormQuery);
    let results = handle.query(&[1, 2, 3, 4], &options).unwrap();
    // Song 0 covers the whole query, song 1 half of it
    assert_eq!(ids(&results), vec![0, 1]);
    assert_eq!(results[0].score, 1.0);
    assert_eq!(results[1].score, 0.5);
}

// ============================================================================
// DETERMINISM & MONOTONICITY
// ============================================================================

#[test]
fn test_repeated_queries_are_identical() {
    let songs = random_songs(5, 200, 20, 50);
    let index = super::common::build_index(&songs);
    let query = [1, 2, 3, 4, 5, 6, 7];
    let first = index.query(&query, &QueryOptions::default().with_limit(100));
    for _ in 0..10 {
        assert_eq!(
            index.query(&query, &QueryOptions::default().with_limit(100)),
            first
        );
    }
}

#[test]
fn test_unrelated_code_lowers_other_scores() {
    let songs = vec![vec![1, 2, 3], vec![3, 4]];
    let index = super::common::build_index(&songs);

    let base = index.query(&[1, 2], &QueryOptions::default());
    // 4 is not in song 0, so song 0's union grows
    let extended = index.query(&[1, 2, 4], &QueryOptions::default());

    fn score(rs: &[echodex::QueryResult], id: usize) -> f32 {
        rs.iter().find(|r| r.song_id == id).unwrap().score
    }
    assert!(score(&extended, 0) < score(&base, 0));
    // Adding a code song 0 already has never lowers it
    let shared = index.query(&[1, 2, 3], &QueryOptions::default());
    assert!(score(&shared, 0) > score(&base, 0));
}
