// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Subcommand implementations.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::time::Instant;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use echodex::binary::block_crc32;
use echodex::{
    decode_fingerprint, decode_fingerprint_full, parse_code_line, read_code_lines,
    read_fingerprint_lines, write_index_blocks_with, BuildOptions, IndexBlock, IndexHandle,
    IndexLoadingError, QueryOptions, Result,
};

use super::display::{self, dim, field, format_size, pad_left, score_value, section_bot, section_top};
use super::QueryArgs;

/// Create a progress style for the build progress bar
#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╸")
}

pub fn run_build(input: &Path, output: &Path, fingerprints: bool) -> Result<()> {
    let reader = BufReader::new(File::open(input)?);
    let lines = if fingerprints {
        read_fingerprint_lines(reader)
    } else {
        read_code_lines(reader)
    };
    let songs: Vec<Vec<u32>> = lines.collect::<Result<_>>()?;
    let n_songs = songs.len();

    if songs.is_empty() {
        eprintln!("⚠️  No songs in {}; nothing written", input.display());
        return Ok(());
    }

    #[cfg(feature = "parallel")]
    let pb = {
        let pb = ProgressBar::new(n_songs as u64);
        pb.set_style(create_progress_style());
        pb.set_prefix("Indexing");
        pb
    };

    let paths = write_index_blocks_with(songs, output, &BuildOptions::default(), |path, block| {
        #[cfg(feature = "parallel")]
        {
            pb.inc(block.n_songs() as u64);
            pb.set_message(path.display().to_string());
        }
        #[cfg(not(feature = "parallel"))]
        let _ = (path, block);
    })?;

    #[cfg(feature = "parallel")]
    pb.finish_with_message(format!("{} blocks", paths.len()));

    eprintln!("✅ Build complete");
    eprintln!("   {} songs │ {} blocks", n_songs, paths.len());
    for path in &paths {
        eprintln!("  ✓ {}", path.display());
    }
    Ok(())
}

pub fn run_decode(fingerprint: &str, offsets: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if offsets {
        let fp = decode_fingerprint_full(fingerprint)?;
        writeln!(out, "offsets: {}", join_csv(&fp.offsets))?;
        writeln!(out, "codes: {}", join_csv(&fp.codes))?;
    } else {
        writeln!(out, "{}", join_csv(&decode_fingerprint(fingerprint)?))?;
    }
    Ok(())
}

pub fn run_query(args: &QueryArgs) -> Result<()> {
    let codes = match (&args.source.codes, &args.source.fingerprint) {
        (Some(csv), _) => parse_code_line(csv)?,
        (None, Some(fp)) => decode_fingerprint(fp)?,
        (None, None) => Vec::new(),
    };

    let handle = IndexHandle::open(&args.index)?;
    let options = QueryOptions::default()
        .with_limit(args.limit)
        .with_similarity(args.similarity);

    let start = Instant::now();
    let results = handle.query(&codes, &options)?;
    let elapsed = start.elapsed();

    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &results).map_err(io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }

    let width = handle.song_count()?.to_string().len();
    for r in &results {
        writeln!(
            out,
            "[{}]: {}",
            pad_left(&r.song_id.to_string(), width),
            score_value(r.score)
        )?;
    }
    eprintln!(
        "{}",
        dim(&format!(
            "{} results ({}) in {:.3} ms",
            results.len(),
            args.similarity,
            elapsed.as_secs_f64() * 1000.0
        ))
    );
    Ok(())
}

pub fn run_inspect(file: &Path) -> Result<()> {
    let bytes = fs::read(file).map_err(|source| IndexLoadingError::Unreadable {
        path: file.to_path_buf(),
        source,
    })?;
    let block = IndexBlock::decode(&bytes).map_err(|source| IndexLoadingError::Malformed {
        path: file.to_path_buf(),
        source,
    })?;
    let stats = block.stats();

    section_top(&file.display().to_string());
    field("codes", &stats.n_codes.to_string());
    field("songs", &stats.n_songs.to_string());
    field("postings", &stats.total_postings.to_string());
    field("longest postings", &stats.longest_postings.to_string());
    field("mean song length", &format!("{:.1}", stats.mean_song_length));
    field("size", &format_size(stats.size_bytes));
    field("crc32", &format!("{:08x}", block_crc32(&bytes)));
    section_bot();
    Ok(())
}

pub fn report_error(err: &echodex::Error) {
    eprintln!("{}", display::error(&err.to_string()));
}

fn join_csv(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
