//! Several blocks loaded as one index.

use super::common::{brute_force_query, build_split_index, ids, random_songs};
use echodex::build::batch_path;
use echodex::{write_index_block, IndexHandle, QueryOptions};
use tempfile::TempDir;

#[test]
fn test_global_ids_follow_path_order() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.idx");
    let b = dir.path().join("b.idx");
    write_index_block(&[vec![1u32, 2], vec![3]], &a).unwrap();
    write_index_block(&[vec![3u32, 4], vec![1, 2]], &b).unwrap();

    let ab = IndexHandle::open([&a, &b]).unwrap();
    assert_eq!(ab.song_count().unwrap(), 4);
    let results = ab.query(&[1, 2], &QueryOptions::default()).unwrap();
    assert_eq!(ids(&results), vec![0, 3]);

    // Reversing the paths renumbers the songs
    let ba = IndexHandle::open([&b, &a]).unwrap();
    let results = ba.query(&[1, 2], &QueryOptions::default()).unwrap();
    assert_eq!(ids(&results), vec![1, 2]);
}

#[test]
fn test_split_index_ranks_like_single_block() {
    let songs = random_songs(42, 240, 20, 300);
    let queries = random_songs(43, 25, 20, 300);

    let whole = build_split_index(&songs, &[240]);
    let split = build_split_index(&songs, &[100, 0, 37, 103]);
    assert_eq!(split.song_count(), 240);

    for q in &queries {
        let options = QueryOptions::default().with_limit(15);
        let expected = brute_force_query(&songs, q, 15);
        assert_eq!(whole.query(q, &options), expected);
        assert_eq!(split.query(q, &options), expected);
    }
}

#[test]
fn test_ties_across_blocks_prefer_lower_global_id() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.idx");
    let b = dir.path().join("b.idx");
    write_index_block(&[vec![9u32], vec![7, 8]], &a).unwrap();
    write_index_block(&[vec![7u32, 8], vec![7, 8]], &b).unwrap();

    let handle = IndexHandle::open([&a, &b]).unwrap();
    let results = handle
        .query(&[7, 8], &QueryOptions::default().with_limit(2))
        .unwrap();
    assert_eq!(ids(&results), vec![1, 2]);
}

#[test]
fn test_batch_paths_load_in_order() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("songs.idx");
    let paths: Vec<_> = (0..3).map(|i| batch_path(&out, i)).collect();
    for (i, path) in paths.iter().enumerate() {
        write_index_block(&[vec![i as u32 * 10], vec![i as u32 * 10 + 1]], path).unwrap();
    }

    let handle = IndexHandle::open(&paths).unwrap();
    assert_eq!(handle.song_count().unwrap(), 6);
    let results = handle.query(&[21], &QueryOptions::default()).unwrap();
    assert_eq!(ids(&results), vec![5]);
}
