// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the echodex command-line interface.
//!
//! Four subcommands: `build` writes index blocks from one-song-per-line
//! input, `decode` prints the codes of an encoded fingerprint, `query` ranks
//! indexed songs against a code set, and `inspect` summarizes a block file.

pub mod commands;
pub mod display;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use echodex::{Similarity, DEFAULT_LIMIT};

#[derive(Parser)]
#[command(
    name = "echodex",
    about = "Inverted index builder and matcher for audio fingerprint codes",
    version
)]
pub struct Cli {
    /// Log to stderr: -v info, -vv debug, -vvv trace (overrides RUST_LOG)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build index blocks from a file with one song per line
    Build {
        /// Input file: comma-separated codes per line, or fingerprints
        #[arg(short, long)]
        input: PathBuf,

        /// Output path; batches beyond 65535 songs get a _NNNN suffix
        #[arg(short, long)]
        output: PathBuf,

        /// Lines are encoded fingerprints instead of code lists
        #[arg(long)]
        fingerprints: bool,
    },

    /// Decode an encoded fingerprint and print its codes
    Decode {
        /// URL-safe base64 fingerprint string
        fingerprint: String,

        /// Also print the time offsets
        #[arg(long)]
        offsets: bool,
    },

    /// Rank indexed songs against a query
    Query(QueryArgs),

    /// Inspect an index block file
    Inspect {
        /// Path to a block file
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct QueryArgs {
    /// Block files, in the order that numbers their songs
    #[arg(short, long = "index", required = true, num_args = 1..)]
    pub index: Vec<PathBuf>,

    #[command(flatten)]
    pub source: QuerySource,

    /// Maximum number of results to return
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// jaccard, set_int or set_int_norm_length_first
    #[arg(short, long, default_value_t = Similarity::Jaccard)]
    pub similarity: Similarity,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct QuerySource {
    /// Comma-separated query codes
    #[arg(short, long)]
    pub codes: Option<String>,

    /// Encoded fingerprint to decode and use as the query
    #[arg(short, long)]
    pub fingerprint: Option<String>,
}
