//! # Content Scanning Module
//!
//! Content globs name the files the CSS generator inspects for utility-class
//! usage. This module compiles them and expands them against a project root.
//!
//! ## Key Features
//!
//! - **Compiled patterns**: invalid globs fail at load time, not at scan time
//! - **Exclusions**: a glob starting with `!` removes matches of earlier globs
//! - **Union semantics**: results are sorted and deduplicated, so authored
//!   order and repeated globs do not change the outcome

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::{debug, warn};
use serde::{Serialize, Serializer};

use crate::core::error::{Result, WindError};

/// A compiled content glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentGlob {
    raw: String,
    negated: bool,
    pattern: Pattern,
}

impl ContentGlob {
    /// Compiles a glob as written in a configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use windcfg::content::ContentGlob;
    ///
    /// let glob = ContentGlob::new("!./templates/admin/**").unwrap();
    /// assert!(glob.is_negated());
    /// assert!(ContentGlob::new("./templates/[").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self> {
        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let pattern = Pattern::new(relative(body)).map_err(|source| {
            WindError::InvalidGlob {
                pattern: raw.to_string(),
                source,
            }
        })?;
        Ok(Self {
            raw: raw.to_string(),
            negated,
            pattern,
        })
    }

    /// The glob as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` for exclusion globs.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Tests a path relative to the project root.
    pub fn matches(&self, relative_path: &Path) -> bool {
        self.pattern.matches_path_with(relative_path, match_options())
    }
}

impl fmt::Display for ContentGlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ContentGlob {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Expands content globs under a project root.
#[derive(Debug, Clone)]
pub struct ContentScanner {
    root: PathBuf,
}

impl ContentScanner {
    /// Creates a scanner rooted at `root`. Globs starting with `./` are
    /// resolved against it.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the files matched by `globs`, relative to the root, sorted and
    /// deduplicated. Directories are skipped.
    pub fn scan(&self, globs: &[ContentGlob]) -> Result<Vec<PathBuf>> {
        if globs.is_empty() {
            warn!("No content globs to scan under {}", self.root.display());
            return Ok(Vec::new());
        }

        let mut found = BTreeSet::new();
        for glob in globs.iter().filter(|g| !g.is_negated()) {
            let full = format!(
                "{}/{}",
                Pattern::escape(&self.root.to_string_lossy()),
                glob.pattern.as_str()
            );
            let entries = glob::glob_with(&full, match_options()).map_err(
                |source| WindError::InvalidGlob {
                    pattern: glob.raw.clone(),
                    source,
                },
            )?;
            for entry in entries {
                let path = entry.map_err(|e| {
                    let path = e.path().to_path_buf();
                    WindError::io(path, e.into_error())
                })?;
                if !path.is_file() {
                    continue;
                }
                let relative_path = path
                    .strip_prefix(&self.root)
                    .map(Path::to_path_buf)
                    .unwrap_or(path);
                _ = found.insert(relative_path);
            }
        }

        let excluded: Vec<&ContentGlob> =
            globs.iter().filter(|g| g.is_negated()).collect();
        let files: Vec<PathBuf> = found
            .into_iter()
            .filter(|path| !excluded.iter().any(|glob| glob.matches(path)))
            .collect();

        debug!(
            "Scanned {} globs under {}: {} files",
            globs.len(),
            self.root.display(),
            files.len()
        );
        Ok(files)
    }
}

fn relative(pattern: &str) -> &str {
    pattern.trim_start_matches("./")
}

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative_path: &str) {
        let path = root.join(relative_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<div class=\"bg-action\"></div>").unwrap();
    }

    fn globs(patterns: &[&str]) -> Vec<ContentGlob> {
        patterns.iter().map(|p| ContentGlob::new(p).unwrap()).collect()
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        assert!(matches!(
            ContentGlob::new("./templates/[*.html"),
            Err(WindError::InvalidGlob { .. })
        ));
    }

    #[test]
    fn test_scan_unions_globs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "templates/index.html");
        touch(root, "templates/partials/nav.html");
        touch(root, "templates/notes.txt");
        touch(root, "node_modules/flowbite/dist/flowbite.js");

        let scanner = ContentScanner::new(root);
        let files = scanner
            .scan(&globs(&[
                "./templates/**/*.html",
                "./node_modules/flowbite/**/*.js",
            ]))
            .unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("node_modules/flowbite/dist/flowbite.js"),
                PathBuf::from("templates/index.html"),
                PathBuf::from("templates/partials/nav.html"),
            ]
        );
    }

    #[test]
    fn test_scan_deduplicates() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "templates/index.html");

        let scanner = ContentScanner::new(temp_dir.path());
        let files = scanner
            .scan(&globs(&["./templates/*.html", "templates/**/*.html"]))
            .unwrap();
        assert_eq!(files, vec![PathBuf::from("templates/index.html")]);
    }

    #[test]
    fn test_negated_globs_exclude() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "templates/index.html");
        touch(temp_dir.path(), "templates/admin/panel.html");

        let scanner = ContentScanner::new(temp_dir.path());
        let files = scanner
            .scan(&globs(&[
                "./templates/**/*.html",
                "!./templates/admin/**",
            ]))
            .unwrap();
        assert_eq!(files, vec![PathBuf::from("templates/index.html")]);
    }

    #[test]
    fn test_empty_globs_yield_nothing() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "templates/index.html");

        let scanner = ContentScanner::new(temp_dir.path());
        assert!(scanner.scan(&[]).unwrap().is_empty());
    }
}
