//! # Plugins Module
//!
//! Plugin references are opaque module names such as `flowbite/plugin`.
//! This module validates them, resolves them to loadable modules through a
//! [`PluginResolver`], and records the resolved set in registration order.
//!
//! ## Usage
//!
//! ```rust
//! use windcfg::plugins::{PluginRef, PluginRegistry, StaticResolver};
//!
//! let resolver = StaticResolver::new().with_plugin("flowbite/plugin", "vendor/flowbite.js");
//! let registry = PluginRegistry::new();
//! registry
//!     .register_all(&[PluginRef::new("flowbite/plugin").unwrap()], &resolver)
//!     .unwrap();
//!
//! assert_eq!(registry.len(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WindError};

/// A validated plugin reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PluginRef(String);

impl PluginRef {
    /// Validates a plugin reference. It must be non-empty and free of
    /// whitespace.
    pub fn new(reference: &str) -> Result<Self> {
        if reference.is_empty() {
            return Err(WindError::config(
                "Plugin reference cannot be empty",
                None,
            ));
        }
        if reference.chars().any(char::is_whitespace) {
            return Err(WindError::config(
                format!(
                    "Plugin reference `{}` must not contain whitespace",
                    reference
                ),
                None,
            ));
        }
        Ok(Self(reference.to_string()))
    }

    /// The reference as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A plugin reference that has been located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPlugin {
    /// The reference as written in the configuration.
    pub reference: PluginRef,
    /// The module file that will be loaded.
    pub module: PathBuf,
}

/// Locates the module a plugin reference names.
pub trait PluginResolver: Send + Sync + fmt::Debug {
    /// Resolves one reference.
    ///
    /// # Returns
    /// * `Result<ResolvedPlugin>` - The located module, or
    ///   `WindError::PluginResolution` if it cannot be found.
    fn resolve(&self, reference: &PluginRef) -> Result<ResolvedPlugin>;
}

/// Resolves references against a project's `node_modules` directory.
///
/// For a reference `pkg/sub` it tries, in order, `node_modules/pkg/sub.js`,
/// `node_modules/pkg/sub/index.js`, and the `main` entry of
/// `node_modules/pkg/sub/package.json`.
#[derive(Debug, Clone)]
pub struct NodeModulesResolver {
    modules_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    main: Option<String>,
}

impl NodeModulesResolver {
    /// Creates a resolver for the project rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            modules_dir: root.as_ref().join("node_modules"),
        }
    }

    fn manifest_entry(&self, package_dir: &Path) -> Result<Option<PathBuf>> {
        let manifest_path = package_dir.join("package.json");
        if !manifest_path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&manifest_path)
            .map_err(|e| WindError::io(manifest_path.clone(), e))?;
        let manifest: PackageManifest =
            serde_json::from_str(&text).map_err(|e| {
                WindError::config(
                    format!("Invalid package manifest: {}", e),
                    Some(manifest_path.clone()),
                )
            })?;
        let main = manifest.main.unwrap_or_else(|| "index.js".to_string());
        let entry = package_dir.join(main);
        Ok(entry.is_file().then_some(entry))
    }
}

impl PluginResolver for NodeModulesResolver {
    fn resolve(&self, reference: &PluginRef) -> Result<ResolvedPlugin> {
        let name = reference.as_str();
        if name.starts_with('.') || name.starts_with('/') {
            return Err(WindError::plugin_resolution(
                name,
                "only package references are supported",
            ));
        }

        let base = self.modules_dir.join(name);
        let mut file = base.clone().into_os_string();
        file.push(".js");
        let candidates = [PathBuf::from(file), base.join("index.js")];
        let found = match candidates.into_iter().find(|c| c.is_file()) {
            Some(path) => Some(path),
            None => self.manifest_entry(&base)?,
        };

        match found {
            Some(module) => {
                debug!("Resolved plugin {} to {}", name, module.display());
                Ok(ResolvedPlugin {
                    reference: reference.clone(),
                    module,
                })
            }
            None => Err(WindError::plugin_resolution(
                name,
                format!("no module found under {}", self.modules_dir.display()),
            )),
        }
    }
}

/// Resolves references from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    modules: HashMap<String, PathBuf>,
}

impl StaticResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reference and the module it resolves to.
    pub fn with_plugin<R, P>(mut self, reference: R, module: P) -> Self
    where
        R: Into<String>,
        P: Into<PathBuf>,
    {
        _ = self.modules.insert(reference.into(), module.into());
        self
    }
}

impl PluginResolver for StaticResolver {
    fn resolve(&self, reference: &PluginRef) -> Result<ResolvedPlugin> {
        self.modules
            .get(reference.as_str())
            .map(|module| ResolvedPlugin {
                reference: reference.clone(),
                module: module.clone(),
            })
            .ok_or_else(|| {
                WindError::plugin_resolution(
                    reference.as_str(),
                    "not a known plugin",
                )
            })
    }
}

/// Resolved plugins in registration order.
///
/// Cloning shares the underlying list.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: Arc<RwLock<Vec<ResolvedPlugin>>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every reference in order and registers them.
    ///
    /// Registration is all-or-nothing: if any reference fails to resolve,
    /// the error is returned and the registry is left unchanged.
    pub fn register_all(
        &self,
        references: &[PluginRef],
        resolver: &dyn PluginResolver,
    ) -> Result<()> {
        let resolved = references
            .iter()
            .map(|reference| resolver.resolve(reference))
            .collect::<Result<Vec<_>>>()?;

        let mut plugins = self.plugins.write();
        for plugin in resolved {
            info!("Registered plugin {}", plugin.reference);
            plugins.push(plugin);
        }
        Ok(())
    }

    /// A snapshot of the registered plugins.
    pub fn plugins(&self) -> Vec<ResolvedPlugin> {
        self.plugins.read().clone()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }
}
