// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Encoded fingerprint decoding.
//!
//! Fingerprinters hand us a compact token: URL-safe base64 around a raw
//! DEFLATE stream around an ASCII payload of hex digits. The payload has two
//! equal halves. The first half is the time offset of every code, the second
//! half the codes themselves, each as a 5-digit hex group.
//!
//! ```text
//! token  = base64url( deflate_raw( payload ) )
//! payload = offsets_hex ++ codes_hex        (equal lengths)
//! codes_hex = "0a1f3" "00c41" "7ffe0" ...   (5 hex digits per code)
//! ```
//!
//! The index ignores time, so [`decode_fingerprint`] only parses the code
//! half. [`decode_fingerprint_full`] parses both for callers that want to
//! align matches in time themselves.

use std::io::Read;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use flate2::read::DeflateDecoder;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::DecodeError;

/// Hex digits per code (and per offset) in the payload.
pub const HEX_GROUP_LEN: usize = 5;

/// URL-safe alphabet, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Both halves of a decoded fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fingerprint {
    /// Time offset of each code, in fingerprinter ticks.
    pub offsets: Vec<u32>,
    /// Codes in payload order; not deduplicated.
    pub codes: Vec<u32>,
}

/// Decode an encoded fingerprint into its code sequence.
///
/// Codes come back in payload order, duplicates included.
pub fn decode_fingerprint(encoded: &str) -> Result<Vec<u32>, DecodeError> {
    let payload = inflate_payload(encoded)?;
    let half = payload.len() / 2;
    parse_hex_groups(&payload[half..], half)
}

/// Decode an encoded fingerprint into offsets and codes.
pub fn decode_fingerprint_full(encoded: &str) -> Result<Fingerprint, DecodeError> {
    let payload = inflate_payload(encoded)?;
    let half = payload.len() / 2;
    Ok(Fingerprint {
        offsets: parse_hex_groups(&payload[..half], 0)?,
        codes: parse_hex_groups(&payload[half..], half)?,
    })
}

/// Decode many fingerprints, failing on the first malformed one.
pub fn decode_fingerprints<S: AsRef<str> + Sync>(
    encoded: &[S],
) -> Result<Vec<Vec<u32>>, DecodeError> {
    #[cfg(feature = "parallel")]
    {
        encoded
            .par_iter()
            .map(|s| decode_fingerprint(s.as_ref()))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        encoded
            .iter()
            .map(|s| decode_fingerprint(s.as_ref()))
            .collect()
    }
}

/// base64 + inflate, returning the raw hex payload.
fn inflate_payload(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    // Some producers emit the standard alphabet; treat +/ as -_
    let token: String = encoded
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();

    let compressed = URL_SAFE_LENIENT.decode(token.as_bytes())?;

    let mut payload = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_end(&mut payload)
        .map_err(DecodeError::Inflate)?;

    Ok(payload)
}

/// Parse consecutive 5-digit hex groups. `base` is the payload offset of
/// `hex`, used in error messages.
fn parse_hex_groups(hex: &[u8], base: usize) -> Result<Vec<u32>, DecodeError> {
    if hex.len() % HEX_GROUP_LEN != 0 {
        return Err(DecodeError::RaggedPayload { len: hex.len() });
    }

    hex.chunks_exact(HEX_GROUP_LEN)
        .enumerate()
        .map(|(i, group)| parse_hex_group(group, base + i * HEX_GROUP_LEN))
        .collect()
}

fn parse_hex_group(group: &[u8], offset: usize) -> Result<u32, DecodeError> {
    if !group.is_ascii() {
        return Err(DecodeError::NotAscii);
    }
    let bad_group = || DecodeError::InvalidHex {
        group: String::from_utf8_lossy(group).into_owned(),
        offset,
    };
    // from_str_radix would accept a leading '+'
    if !group.iter().all(u8::is_ascii_hexdigit) {
        return Err(bad_group());
    }
    let text = std::str::from_utf8(group).map_err(|_| DecodeError::NotAscii)?;
    u32::from_str_radix(text, 16).map_err(|_| bad_group())
}
