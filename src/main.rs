// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
use cli::{commands, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG unless -v given
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Build {
            input,
            output,
            fingerprints,
        } => commands::run_build(input, output, *fingerprints),
        Commands::Decode {
            fingerprint,
            offsets,
        } => commands::run_decode(fingerprint, *offsets),
        Commands::Query(args) => commands::run_query(args),
        Commands::Inspect { file } => commands::run_inspect(file),
    };

    if let Err(e) = result {
        commands::report_error(&e);
        std::process::exit(1);
    }
}
