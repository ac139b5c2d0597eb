//! Load/release lifecycle and load failures.

use std::fs;

use echodex::{
    write_index_block, Error, HandleState, IndexHandle, IndexLoadingError, QueryOptions,
    SharedIndex, UsageError,
};
use tempfile::TempDir;

#[test]
fn test_nonexistent_path_fails_and_handle_stays_unusable() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.idx");

    let mut handle = IndexHandle::new([&missing]);
    let err = handle.load().unwrap_err();
    assert!(matches!(err, IndexLoadingError::Unreadable { .. }));
    assert_eq!(err.path(), Some(&missing));

    assert_eq!(
        handle.query(&[1, 2, 3], &QueryOptions::default()).unwrap_err(),
        UsageError::NotLoaded
    );
    assert_eq!(handle.song_count().unwrap_err(), UsageError::NotLoaded);
}

#[test]
fn test_corrupt_blocks_are_rejected() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.idx");
    write_index_block(&[vec![1u32, 2], vec![2, 3]], &good).unwrap();
    let bytes = fs::read(&good).unwrap();

    let cases: Vec<(&str, Vec<u8>)> = vec![
        ("empty", Vec::new()),
        ("short header", bytes[..5].to_vec()),
        ("truncated postings", bytes[..bytes.len() - 1].to_vec()),
        ("trailing byte", [bytes.as_slice(), &[0]].concat()),
        ("song count lies", {
            let mut b = bytes.clone();
            b[4] = 200;
            b
        }),
    ];

    for (name, data) in cases {
        let path = dir.path().join(format!("{}.idx", name.replace(' ', "_")));
        fs::write(&path, &data).unwrap();
        let err = IndexHandle::open([&path]).unwrap_err();
        assert!(
            matches!(err, IndexLoadingError::Malformed { .. }),
            "{}: expected Malformed, got {:?}",
            name,
            err
        );
        assert_eq!(err.path(), Some(&path), "{}", name);
    }
}

#[test]
fn test_one_bad_block_aborts_whole_load() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.idx");
    let b = dir.path().join("b.idx");
    write_index_block(&[vec![1u32]], &a).unwrap();
    fs::write(&b, b"garbage!").unwrap();

    let mut handle = IndexHandle::new([&a, &b]);
    let err = handle.load().unwrap_err();
    assert_eq!(err.path(), Some(&b));
    assert_eq!(handle.state(), HandleState::Unloaded);
    // Block a loaded fine, but it must not be reachable
    assert!(handle.query(&[1], &QueryOptions::default()).is_err());
}

#[test]
fn test_release_is_idempotent_and_reload_works() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("songs.idx");
    write_index_block(&[vec![5u32, 6]], &path).unwrap();

    let mut handle = IndexHandle::new([&path]);
    handle.release();
    handle.release();
    assert_eq!(
        handle.query(&[5], &QueryOptions::default()).unwrap_err(),
        UsageError::Released
    );

    handle.load().unwrap();
    assert_eq!(handle.query(&[5, 6], &QueryOptions::default()).unwrap()[0].score, 1.0);
    handle.release();
    assert_eq!(handle.state(), HandleState::Released);
}

#[test]
fn test_errors_flow_into_umbrella_type() {
    fn load_and_count(path: &std::path::Path) -> echodex::Result<usize> {
        let handle = IndexHandle::open([path])?;
        Ok(handle.song_count()?)
    }

    let dir = TempDir::new().unwrap();
    let err = load_and_count(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, Error::Loading(IndexLoadingError::Unreadable { .. })));
    assert!(err.to_string().contains("absent"));
}

#[test]
fn test_shared_index_reload_while_shared() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("songs.idx");
    write_index_block(&[vec![1u32], vec![2]], &path).unwrap();

    let shared = SharedIndex::new([&path]);
    let reader = shared.clone();
    shared.load().unwrap();
    assert_eq!(reader.song_count().unwrap(), 2);

    write_index_block(&[vec![1u32], vec![2], vec![3]], &path).unwrap();
    shared.load().unwrap();
    assert_eq!(reader.song_count().unwrap(), 3);
    assert_eq!(
        reader
            .with_index(|index| index.query(&[3], &QueryOptions::default())[0].song_id)
            .unwrap(),
        2
    );
}
