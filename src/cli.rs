// Copyright © 2024 windcfg. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line interface for windcfg
//!
//! This module provides the command tree for inspecting a build
//! configuration: validating it, printing the merged theme, listing the files
//! the content globs match, and resolving plugins.
//!
//! # Examples
//!
//! ```
//! use windcfg::cli;
//!
//! let matches = cli::build().get_matches_from(vec![
//!     "windcfg",
//!     "--config",
//!     "site.json",
//!     "theme",
//!     "--json",
//! ]);
//!
//! let theme_cmd = matches.subcommand_matches("theme").unwrap();
//! assert!(theme_cmd.get_flag("json"));
//! ```

use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::debug;

use crate::content::ContentScanner;
use crate::core::config::{ConfigBuilder, ConfigDescriptor, ValidationMode};
use crate::core::error::{Result, WindError};
use crate::plugins::{NodeModulesResolver, PluginRegistry};
use crate::theme::{ThemeTokens, TokenCategory, TokenSource};

/// The current version of windcfg, as defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file.
pub const DEFAULT_CONFIG: &str = "windcfg.toml";
/// Default project root for scanning and plugin resolution.
pub const DEFAULT_ROOT: &str = ".";
/// Prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "WINDCFG_";

/// Builds and configures the windcfg command-line interface.
pub fn build() -> Command {
    debug!("Building CLI command structure");

    let root_arg = Arg::new("root")
        .short('r')
        .long("root")
        .help("Project root")
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_ROOT);

    Command::new("windcfg")
        .about("Inspect and validate CSS utility framework build configuration.")
        .version(VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file (.toml, .json, .yaml)")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_CONFIG)
                .global(true),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .help("Warn about unknown token categories instead of failing")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v, -vv)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("check").about("Validate the configuration"),
        )
        .subcommand(
            Command::new("theme")
                .about("Print the merged theme")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("scan")
                .about("List the files matched by the content globs")
                .arg(root_arg.clone()),
        )
        .subcommand(
            Command::new("plugins")
                .about("Resolve plugins against node_modules")
                .arg(root_arg),
        )
}

/// Runs the command described by `matches`.
///
/// # Returns
/// * `Result<String>` - The command output, or an error if execution fails.
pub fn run(matches: &ArgMatches) -> Result<String> {
    let descriptor = load(matches)?;

    match matches.subcommand() {
        Some(("check", _)) => Ok(check(&descriptor)),
        Some(("theme", sub_matches)) => {
            theme(&descriptor, sub_matches.get_flag("json"))
        }
        Some(("scan", sub_matches)) => scan(&descriptor, &root(sub_matches)),
        Some(("plugins", sub_matches)) => {
            plugins(&descriptor, &root(sub_matches))
        }
        _ => Err(WindError::config("Unknown command", None)),
    }
}

fn load(matches: &ArgMatches) -> Result<ConfigDescriptor> {
    let path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mode = if matches.get_flag("lenient") {
        ValidationMode::Lenient
    } else {
        ValidationMode::Strict
    };

    ConfigBuilder::new()
        .with_file(path)
        .with_env_prefix(ENV_PREFIX)
        .with_mode(mode)
        .build()
}

fn root(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>("root")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT))
}

fn check(descriptor: &ConfigDescriptor) -> String {
    let count = |tokens: &ThemeTokens| -> usize {
        tokens.values().map(|set| set.len()).sum()
    };
    let mut lines = vec![format!(
        "Configuration OK: {} content globs, {} theme overrides, {} extend tokens, {} plugins",
        descriptor.content().len(),
        count(descriptor.theme_overrides()),
        count(descriptor.extend_tokens()),
        descriptor.plugins().len()
    )];
    if descriptor.content().is_empty() {
        lines.push(
            "warning: no content globs, generated CSS will be near-empty"
                .to_string(),
        );
    }
    lines.join("\n")
}

fn theme(descriptor: &ConfigDescriptor, json: bool) -> Result<String> {
    let theme = descriptor.resolve_theme();
    if json {
        return serde_json::to_string_pretty(&theme).map_err(|e| {
            WindError::config(format!("Failed to serialise theme: {}", e), None)
        });
    }

    let lines: Vec<String> = TokenCategory::ALL
        .iter()
        .flat_map(|category| {
            theme.category(*category).map(move |(name, token)| {
                let source = match token.source {
                    TokenSource::Default => "",
                    TokenSource::Override => "  (override)",
                    TokenSource::Extend => "  (extend)",
                };
                format!("{}.{} = {}{}", category, name, token.value, source)
            })
        })
        .collect();
    Ok(lines.join("\n"))
}

fn scan(descriptor: &ConfigDescriptor, root: &Path) -> Result<String> {
    let files = ContentScanner::new(root).scan(descriptor.content())?;
    Ok(files
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn plugins(descriptor: &ConfigDescriptor, root: &Path) -> Result<String> {
    let registry = PluginRegistry::new();
    registry.register_all(
        descriptor.plugins(),
        &NodeModulesResolver::new(root),
    )?;
    Ok(registry
        .plugins()
        .iter()
        .map(|plugin| {
            format!("{} -> {}", plugin.reference, plugin.module.display())
        })
        .collect::<Vec<_>>()
        .join("\n"))
}
