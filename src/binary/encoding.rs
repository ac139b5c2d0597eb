// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fixed-width little-endian integer primitives.
//!
//! Every number in a block is a plain u16, u32 or u64 in little-endian order.
//! No varints, no delta coding: a block is meant to be loaded with a handful
//! of bulk reads, and fixed widths keep the offset arithmetic trivial.
//!
//! Two tiers of writers. The `put_*` functions take values that already have
//! the target type and cannot fail. The `encode_*` functions take wider
//! values and reject anything that does not fit, leaving the buffer
//! untouched on error.
//!
//! [`ByteReader`] is the matching decoder: a cursor over a byte slice that
//! turns short input into `UnexpectedEof` instead of panicking.

use std::io;

use crate::error::EncodeError;

// ============================================================================
// INFALLIBLE WRITERS
// ============================================================================

#[inline]
pub fn put_u16(value: u16, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_le_bytes());
}

#[inline]
pub fn put_u32(value: u32, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_le_bytes());
}

#[inline]
pub fn put_u64(value: u64, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_u16s(values: &[u16], buf: &mut Vec<u8>) {
    buf.reserve(values.len() * 2);
    for &v in values {
        put_u16(v, buf);
    }
}

pub fn put_u32s(values: &[u32], buf: &mut Vec<u8>) {
    buf.reserve(values.len() * 4);
    for &v in values {
        put_u32(v, buf);
    }
}

// ============================================================================
// RANGE-CHECKED ENCODERS
// ============================================================================

/// Encode a value as a little-endian u16, failing if it exceeds `u16::MAX`.
pub fn encode_u16(value: u64, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    let narrow = u16::try_from(value).map_err(|_| EncodeError { value, bits: 16 })?;
    put_u16(narrow, buf);
    Ok(())
}

/// Encode a value as a little-endian u32, failing if it exceeds `u32::MAX`.
pub fn encode_u32(value: u64, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    let narrow = u32::try_from(value).map_err(|_| EncodeError { value, bits: 32 })?;
    put_u32(narrow, buf);
    Ok(())
}

/// Encode a value as a little-endian u64. Every u64 fits.
pub fn encode_u64(value: u64, buf: &mut Vec<u8>) {
    put_u64(value, buf);
}

/// Encode a sequence as consecutive u16s. On error nothing is appended.
pub fn encode_u16_slice<T: Copy + Into<u64>>(
    values: &[T],
    buf: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    encode_all(values, buf, encode_u16)
}

/// Encode a sequence as consecutive u32s. On error nothing is appended.
pub fn encode_u32_slice<T: Copy + Into<u64>>(
    values: &[T],
    buf: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    encode_all(values, buf, encode_u32)
}

/// Encode a sequence as consecutive u64s.
pub fn encode_u64_slice<T: Copy + Into<u64>>(values: &[T], buf: &mut Vec<u8>) {
    buf.reserve(values.len() * 8);
    for &v in values {
        put_u64(v.into(), buf);
    }
}

fn encode_all<T: Copy + Into<u64>>(
    values: &[T],
    buf: &mut Vec<u8>,
    encode_one: fn(u64, &mut Vec<u8>) -> Result<(), EncodeError>,
) -> Result<(), EncodeError> {
    let rollback = buf.len();
    for &v in values {
        if let Err(e) = encode_one(v.into(), buf) {
            buf.truncate(rollback);
            return Err(e);
        }
    }
    Ok(())
}

// ============================================================================
// DECODER
// ============================================================================

/// Little-endian cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize, what: &str) -> io::Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "Truncated {}: need {} bytes at offset {}, have {}",
                        what,
                        len,
                        self.pos,
                        self.remaining()
                    ),
                )
            })?;
        let bytes = self.bytes;
        let slice = &bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let b = self.take(2, "u16")?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let b = self.take(4, "u32")?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> io::Result<u64> {
        let b = self.take(8, "u64")?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_le_bytes(arr))
    }

    /// Read `count` consecutive u16s. `what` names the section in errors.
    pub fn read_u16_vec(&mut self, count: usize, what: &str) -> io::Result<Vec<u16>> {
        let len = count.checked_mul(2).ok_or_else(|| too_large(what, count))?;
        let bytes = self.take(len, what)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect())
    }

    /// Read `count` consecutive u32s. `what` names the section in errors.
    pub fn read_u32_vec(&mut self, count: usize, what: &str) -> io::Result<Vec<u32>> {
        let len = count.checked_mul(4).ok_or_else(|| too_large(what, count))?;
        let bytes = self.take(len, what)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Read `count` consecutive u64s. `what` names the section in errors.
    pub fn read_u64_vec(&mut self, count: usize, what: &str) -> io::Result<Vec<u64>> {
        let len = count.checked_mul(8).ok_or_else(|| too_large(what, count))?;
        let bytes = self.take(len, what)?;
        Ok(bytes
            .chunks_exact(8)
            .map(|c| {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(c);
                u64::from_le_bytes(arr)
            })
            .collect())
    }
}

fn too_large(what: &str, count: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{} count {} overflows the address space", what, count),
    )
}
