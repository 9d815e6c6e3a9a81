// Copyright © 2024 windcfg. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # windcfg CLI
//!
//! This is the main entry point for the windcfg command-line interface.
//! It initializes the logger, runs the selected command and prints its output.

use anyhow::Context;
use log::{info, LevelFilter};
use windcfg::cli;

/// Initializes logging from the `-v` count, falling back to `RUST_LOG`.
fn init_logger(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbosity {
        0 => {}
        1 => {
            _ = builder.filter_level(LevelFilter::Info);
        }
        _ => {
            _ = builder.filter_level(LevelFilter::Debug);
        }
    }
    builder.init();
}

/// Runs the command selected on the command line.
///
/// # Errors
///
/// This function will return an error if:
/// - The configuration file is missing, malformed or fails validation.
/// - A plugin cannot be resolved or a content path cannot be read.
fn run() -> Result<(), anyhow::Error> {
    let matches = cli::build().get_matches();
    init_logger(matches.get_count("verbose"));
    info!("Starting windcfg v{}", cli::VERSION);

    let output = cli::run(&matches).context("windcfg failed")?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// The main entry point for the windcfg CLI.
fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
