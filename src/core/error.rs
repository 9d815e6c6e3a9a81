//! # Error Handling for windcfg
//!
//! This module defines the error taxonomy for loading, validating and
//! consuming a build configuration. The `thiserror` crate is used to
//! keep every variant's message consistent across the library.
//!
//! Every failure is fatal to the step that produced it. Malformed input never
//! yields a partially populated descriptor.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A unified result type for the windcfg library.
pub type Result<T> = std::result::Result<T, WindError>;

/// The main error type for windcfg, encompassing all potential error cases.
#[derive(Error, Debug)]
pub enum WindError {
    /// The configuration text could not be parsed into the expected shape.
    ///
    /// Raised for syntax errors, truncated input, wrong value kinds and
    /// unknown top-level keys. Carries the location when the underlying
    /// parser reports one.
    #[error("Parse error{}: {message}", location(.path, .line, .column))]
    Parse {
        /// Description reported by the parser.
        message: String,
        /// Path of the configuration file, if loaded from disk.
        path: Option<PathBuf>,
        /// One-based line of the malformed location.
        line: Option<usize>,
        /// One-based column of the malformed location.
        column: Option<usize>,
    },

    /// Error related to configuration layering or unsupported inputs.
    #[error("Configuration error: {message}.")]
    Config {
        /// Detailed description of the configuration error.
        message: String,
        /// Optional path of the configuration file that caused the error.
        path: Option<PathBuf>,
    },

    /// A theme section names a token category the framework does not know.
    #[error("Unknown token category `{category}`.")]
    UnknownCategory {
        /// The category name as written in the configuration.
        category: String,
    },

    /// A content glob failed to compile.
    #[error("Invalid content glob `{pattern}`: {source}")]
    InvalidGlob {
        /// The pattern as written in the configuration.
        pattern: String,
        /// The underlying pattern error.
        #[source]
        source: glob::PatternError,
    },

    /// A plugin reference could not be resolved to a loadable module.
    #[error("Plugin `{reference}` could not be resolved: {message}.")]
    PluginResolution {
        /// The plugin reference as written in the configuration.
        reference: String,
        /// Why resolution failed.
        message: String,
    },

    /// IO error encountered during file operations.
    #[error("File IO error at `{path:?}`: {source}")]
    Io {
        /// Path associated with the IO error.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for WindError {
    /// Converts a standard IO error into a `WindError::Io` with an empty path.
    fn from(source: std::io::Error) -> Self {
        WindError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl WindError {
    /// Creates a `Parse` error.
    pub fn parse<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
        line: Option<usize>,
        column: Option<usize>,
    ) -> Self {
        WindError::Parse {
            message: message.into(),
            path,
            line,
            column,
        }
    }

    /// Creates a `Config` error with a specific message.
    ///
    /// # Parameters
    /// - `message`: A description of the configuration error.
    /// - `path`: Optional path of the configuration file causing the error.
    pub fn config<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
    ) -> Self {
        WindError::Config {
            message: message.into(),
            path,
        }
    }

    /// Creates a `PluginResolution` error.
    pub fn plugin_resolution<R, S>(reference: R, message: S) -> Self
    where
        R: Into<String>,
        S: Into<String>,
    {
        WindError::PluginResolution {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Wraps an IO error as an `Io` variant with the specified path.
    pub fn io(path: PathBuf, source: std::io::Error) -> Self {
        WindError::Io { path, source }
    }

    /// Attaches a file path to a `Parse` or `Config` error that lacks one.
    ///
    /// Other variants are returned unchanged.
    pub fn with_path(self, file: &Path) -> Self {
        match self {
            WindError::Parse {
                message,
                path: None,
                line,
                column,
            } => WindError::Parse {
                message,
                path: Some(file.to_path_buf()),
                line,
                column,
            },
            WindError::Config {
                message,
                path: None,
            } => WindError::Config {
                message,
                path: Some(file.to_path_buf()),
            },
            other => other,
        }
    }
}

fn location<'a>(
    path: &'a Option<PathBuf>,
    line: &Option<usize>,
    column: &Option<usize>,
) -> Location<'a> {
    Location {
        path: path.as_deref(),
        line: *line,
        column: *column,
    }
}

/// Renders ` in <path> at line L, column C` for parse errors.
struct Location<'a> {
    path: Option<&'a Path>,
    line: Option<usize>,
    column: Option<usize>,
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = self.path {
            write!(f, " in {}", path.display())?;
        }
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, " at line {}, column {}", line, column)
            }
            (Some(line), None) => write!(f, " at line {}", line),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_reports_location() {
        let err = WindError::parse(
            "expected `]`",
            Some(PathBuf::from("windcfg.toml")),
            Some(3),
            Some(7),
        );
        assert_eq!(
            err.to_string(),
            "Parse error in windcfg.toml at line 3, column 7: expected `]`"
        );
    }

    #[test]
    fn test_parse_error_without_location() {
        let err = WindError::parse("truncated input", None, None, None);
        assert_eq!(err.to_string(), "Parse error: truncated input");
    }

    #[test]
    fn test_with_path_fills_missing_path() {
        let err = WindError::parse("bad", None, Some(1), None)
            .with_path(Path::new("site.json"));
        assert_eq!(err.to_string(), "Parse error in site.json at line 1: bad");

        let err = WindError::plugin_resolution("x", "missing")
            .with_path(Path::new("site.json"));
        assert!(matches!(err, WindError::PluginResolution { .. }));
    }
}
