// Copyright © 2024 windcfg. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # windcfg Library
//!
//! windcfg loads the build configuration of a CSS utility framework: which
//! files to scan for class usage, which design tokens to override or extend,
//! and which plugins to register. It validates that configuration into an
//! immutable [`ConfigDescriptor`] and prepares everything a CSS generator
//! needs before generation starts.
//!
//! The preparation follows the consumer protocol: merge theme overrides and
//! extend tokens into the defaults, resolve and register plugins in listed
//! order, then expand the content globs.

#![doc = include_str!("../README.md")]
#![doc(html_root_url = "https://docs.rs/windcfg")]

use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

/// Module containing core utilities, such as configuration and error handling.
pub mod core {
    /// Loading, layering and validation of the build configuration.
    pub mod config;
    /// Contains error types and handling for windcfg.
    pub mod error;
}

/// Provides command-line interface utilities.
pub mod cli;

/// Content glob compilation and scanning.
pub mod content;

/// Plugin references, resolution and registration.
pub mod plugins;

/// Design tokens and theme merging.
pub mod theme;

pub use crate::core::config::{
    ConfigBuilder, ConfigDescriptor, Format, ValidationMode,
};
pub use crate::core::error::{Result, WindError};

use crate::content::ContentScanner;
use crate::plugins::{PluginRegistry, PluginResolver, ResolvedPlugin};
use crate::theme::ResolvedTheme;

/// Everything prepared for one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// The merged theme.
    pub theme: ResolvedTheme,
    /// Plugins in registration order.
    pub plugins: Vec<ResolvedPlugin>,
    /// Files to scan for class usage, relative to the project root.
    pub sources: Vec<PathBuf>,
}

/// Prepares a build from a configuration.
#[derive(Debug)]
pub struct WindCfg {
    descriptor: ConfigDescriptor,
    resolver: Box<dyn PluginResolver>,
}

impl WindCfg {
    /// Creates a new instance of `WindCfg`.
    pub fn new(
        descriptor: ConfigDescriptor,
        resolver: Box<dyn PluginResolver>,
    ) -> Self {
        Self {
            descriptor,
            resolver,
        }
    }

    /// The configuration this instance was built from.
    pub fn descriptor(&self) -> &ConfigDescriptor {
        &self.descriptor
    }

    /// Merges the theme, registers plugins and scans content under `root`.
    ///
    /// Fails on the first unresolvable plugin or unreadable content path;
    /// no partial plan is returned.
    pub fn prepare<P: AsRef<Path>>(&self, root: P) -> Result<BuildPlan> {
        let root = root.as_ref();
        info!("Preparing build under {}", root.display());

        let theme = self.descriptor.resolve_theme();

        let registry = PluginRegistry::new();
        registry.register_all(self.descriptor.plugins(), self.resolver.as_ref())?;

        let sources =
            ContentScanner::new(root).scan(self.descriptor.content())?;

        info!(
            "Build prepared: {} tokens, {} plugins, {} source files",
            theme.len(),
            registry.len(),
            sources.len()
        );

        Ok(BuildPlan {
            theme,
            plugins: registry.plugins(),
            sources,
        })
    }
}
