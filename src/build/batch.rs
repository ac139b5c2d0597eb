// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Writing blocks to disk, splitting large collections into batches.
//!
//! A collection bigger than one block holds is cut into consecutive batches
//! of [`MAX_SONGS_PER_BLOCK`] songs. Batch `n` is written to
//! `<output>_<nnnn>`; if there turns out to be only one batch it is renamed
//! to `<output>` itself. Loading the returned paths in order gives every
//! song its position in the input as its global id.
//!
//! If any batch fails, the batch files already written for this build are
//! removed before the error is returned.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::binary::{IndexBlock, MAX_SONGS_PER_BLOCK};
use crate::error::{IndexWriteError, Result};

use super::BuildOptions;

/// Build one block from `songs` and write it to `path`.
pub fn write_index_block<S>(songs: &[S], path: &Path) -> Result<()>
where
    S: AsRef<[u32]> + Sync,
{
    let block = IndexBlock::from_code_sequences(songs, &BuildOptions::default())?;
    write_block_file(&block, path)?;
    Ok(())
}

/// Path of the `batch`-th block written for `output`.
pub fn batch_path(output: &Path, batch: usize) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(format!("_{:04}", batch));
    PathBuf::from(name)
}

/// Write `songs` as one or more blocks and return their paths in load order.
///
/// An empty input writes nothing and returns no paths.
pub fn write_index_blocks<I>(songs: I, output: &Path) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = Vec<u32>>,
{
    write_index_blocks_with(songs, output, &BuildOptions::default(), |_, _| {})
}

/// [`write_index_blocks`] with build options and a callback run after each
/// block is on disk.
pub fn write_index_blocks_with<I, F>(
    songs: I,
    output: &Path,
    options: &BuildOptions,
    mut on_block: F,
) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = Vec<u32>>,
    F: FnMut(&Path, &IndexBlock),
{
    let mut paths = Vec::new();
    let mut total_songs = 0usize;
    let mut batch: Vec<Vec<u32>> = Vec::new();

    let mut flush = |batch: &mut Vec<Vec<u32>>, paths: &mut Vec<PathBuf>| -> Result<()> {
        let path = batch_path(output, paths.len());
        let block = IndexBlock::from_code_sequences(batch.as_slice(), options)?;
        write_block_file(&block, &path)?;
        debug!(
            path = %path.display(),
            songs = block.n_songs(),
            codes = block.n_codes(),
            "wrote index block"
        );
        on_block(&path, &block);
        total_songs += batch.len();
        batch.clear();
        paths.push(path);
        Ok(())
    };

    let written = || -> Result<()> {
        for codes in songs {
            batch.push(codes);
            if batch.len() == MAX_SONGS_PER_BLOCK {
                flush(&mut batch, &mut paths)?;
            }
        }
        if !batch.is_empty() {
            flush(&mut batch, &mut paths)?;
        }
        Ok(())
    };
    if let Err(e) = written() {
        remove_partial_batches(output, paths.len());
        return Err(e);
    }

    if let [only] = paths.as_mut_slice() {
        fs::rename(&*only, output).map_err(|source| IndexWriteError {
            path: output.to_path_buf(),
            source,
        })?;
        *only = output.to_path_buf();
    }

    info!(
        output = %output.display(),
        blocks = paths.len(),
        songs = total_songs,
        "index build finished"
    );
    Ok(paths)
}

/// Best-effort cleanup after a failed build: batches `0..=failed` are
/// removed, including a half-written file for the failing batch.
fn remove_partial_batches(output: &Path, failed: usize) {
    for n in 0..=failed {
        let path = batch_path(output, n);
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed partial batch"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial batch"),
        }
    }
}

fn write_block_file(block: &IndexBlock, path: &Path) -> std::result::Result<(), IndexWriteError> {
    let write = || -> std::io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        block.write_to(&mut w)?;
        w.flush()
    };
    write().map_err(|source| IndexWriteError {
        path: path.to_path_buf(),
        source,
    })
}
