// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Code sequence normalization.
//!
//! A fingerprint is a bag of codes. Temporal order and repetition carry no
//! meaning for the index, so both the builder and the query path reduce a
//! sequence to its sorted distinct set before touching postings.

/// Sorted distinct codes of a sequence.
///
/// ```
/// use echodex::sorted_distinct;
///
/// assert_eq!(sorted_distinct(&[9, 3, 9, 1, 3]), vec![1, 3, 9]);
/// ```
pub fn sorted_distinct(codes: &[u32]) -> Vec<u32> {
    let mut out = codes.to_vec();
    sorted_distinct_in_place(&mut out);
    out
}

/// Sort and deduplicate `codes` without allocating.
pub fn sorted_distinct_in_place(codes: &mut Vec<u32>) {
    codes.sort_unstable();
    codes.dedup();
}

/// Whether `codes` is already strictly ascending (sorted, no repeats).
pub fn is_sorted_distinct(codes: &[u32]) -> bool {
    codes.windows(2).all(|w| w[0] < w[1])
}
