//! Block format and builder invariants.

use std::collections::BTreeSet;

use echodex::binary::{BlockHeader, ByteReader};
use echodex::{build_index_block, sorted_distinct, IndexBlock};
use proptest::prelude::*;

fn songs_strategy() -> impl Strategy<Value = Vec<Vec<u32>>> {
    prop::collection::vec(prop::collection::vec(any::<u32>(), 0..20), 0..30)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// Header counts and section sizes add up to the byte length.
    #[test]
    fn prop_layout_accounts_for_every_byte(songs in songs_strategy()) {
        let bytes = build_index_block(&songs).unwrap();
        let header = BlockHeader::read(&mut &bytes[..]).unwrap();
        prop_assert_eq!(header.n_songs as usize, songs.len());

        let distinct: BTreeSet<u32> = songs.iter().flatten().copied().collect();
        prop_assert_eq!(header.n_codes as usize, distinct.len());

        let postings: usize = songs.iter().map(|s| sorted_distinct(s).len()).sum();
        let expected = 8 + 8 * distinct.len() + 4 * songs.len() + 2 * postings;
        prop_assert_eq!(bytes.len(), expected);
    }

    /// Every code a song has lists that song, and nothing else is listed.
    #[test]
    fn prop_postings_are_exact(songs in songs_strategy()) {
        let block = IndexBlock::decode(&build_index_block(&songs).unwrap()).unwrap();
        let sets: Vec<BTreeSet<u32>> = songs.iter().map(|s| s.iter().copied().collect()).collect();

        prop_assert!(block.codes().windows(2).all(|w| w[0] < w[1]));
        for (code, list) in block.iter() {
            let expected: Vec<u16> = sets
                .iter()
                .enumerate()
                .filter(|(_, s)| s.contains(&code))
                .map(|(i, _)| i as u16)
                .collect();
            prop_assert_eq!(list, expected.as_slice());
        }
        for (i, set) in sets.iter().enumerate() {
            prop_assert_eq!(block.song_length(i), Some(set.len() as u32));
        }
    }

    /// Re-encoding a decoded block reproduces the input bytes.
    #[test]
    fn prop_decode_encode_is_identity(songs in songs_strategy()) {
        let bytes = build_index_block(&songs).unwrap();
        prop_assert_eq!(IndexBlock::decode(&bytes).unwrap().encode(), bytes);
    }

    /// Any truncation of a valid block is rejected, never panics.
    #[test]
    fn prop_truncation_is_rejected(songs in songs_strategy(), cut in any::<prop::sample::Index>()) {
        let bytes = build_index_block(&songs).unwrap();
        let at = cut.index(bytes.len());
        prop_assert!(IndexBlock::decode(&bytes[..at]).is_err());
    }

    /// Arbitrary bytes either decode to a valid block or error; never panic.
    #[test]
    fn prop_garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(block) = IndexBlock::decode(&bytes) {
            prop_assert_eq!(block.encode(), bytes);
        }
    }

    /// The reader consumes exactly what the writers produced.
    #[test]
    fn prop_reader_consumes_writer_output(values in prop::collection::vec(any::<u32>(), 0..64)) {
        let mut buf = Vec::new();
        echodex::binary::encode_u32_slice(&values, &mut buf).unwrap();
        let mut r = ByteReader::new(&buf);
        prop_assert_eq!(r.read_u32_vec(values.len(), "values").unwrap(), values);
        prop_assert!(r.is_empty());
    }
}
