//! # Configuration Module
//!
//! Loads, validates and layers the build configuration consumed by the CSS
//! generation step. A configuration declares which files to scan for class
//! usage, theme overrides and extend tokens, and the plugins to register.
//!
//! ## Features
//!
//! - TOML, JSON and YAML sources, selected by file extension
//! - All-or-nothing loading with line and column on parse errors
//! - Closed set of token categories, strict or lenient validation
//! - Environment and programmatic overrides on top of a file
//!
//! ## Example
//!
//! ```rust
//! use windcfg::core::config::{ConfigBuilder, Format};
//!
//! let descriptor = ConfigBuilder::new()
//!     .with_source(
//!         r##"
//!         content = ["./templates/**/*.html"]
//!         plugins = ["flowbite/plugin"]
//!
//!         [theme.colors]
//!         action = "#5B4CA9"
//!         "##,
//!         Format::Toml,
//!     )
//!     .with_override("extend.spacing.128", "32rem")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(descriptor.content().len(), 1);
//! assert_eq!(descriptor.resolve_theme().get("spacing.128"), Some("32rem"));
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::content::ContentGlob;
use crate::core::error::{Result, WindError};
use crate::plugins::PluginRef;
use crate::theme::{
    default_tokens, ResolvedTheme, ThemeTokens, TokenCategory, TokenSet,
};

/// The configuration shipped with this repository.
const BUNDLED_SOURCE: &str = include_str!("../../windcfg.toml");

/// How unknown token categories are treated while validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Unknown categories fail the load.
    Strict,
    /// Unknown categories are dropped with a warning.
    Lenient,
}

impl Default for ValidationMode {
    fn default() -> Self {
        ValidationMode::Strict
    }
}

/// Source formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// TOML document.
    Toml,
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl Format {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(Format::Toml),
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(WindError::config(
                "Unsupported configuration format, expected .toml, .json, .yaml or .yml",
                Some(path.to_path_buf()),
            )),
        }
    }
}

/// A validated, immutable build configuration.
///
/// Construct one with [`ConfigDescriptor::parse`],
/// [`ConfigDescriptor::from_file`], [`ConfigDescriptor::bundled`] or a
/// [`ConfigBuilder`]. There is no mutating API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDescriptor {
    content: Vec<ContentGlob>,
    theme: ThemeTokens,
    extend: ThemeTokens,
    plugins: Vec<PluginRef>,
}

impl ConfigDescriptor {
    /// Returns the configuration shipped with this repository.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_SOURCE, Format::Toml)
    }

    /// Parses a configuration in strict mode.
    pub fn parse(source: &str, format: Format) -> Result<Self> {
        Self::parse_with_mode(source, format, ValidationMode::Strict)
    }

    /// Parses a configuration with the given validation mode.
    pub fn parse_with_mode(
        source: &str,
        format: Format,
        mode: ValidationMode,
    ) -> Result<Self> {
        validate(parse_raw(source, format)?, mode)
    }

    /// Loads a configuration file in strict mode.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigBuilder::new().with_file(path).build()
    }

    /// Content globs in authored order.
    pub fn content(&self) -> &[ContentGlob] {
        &self.content
    }

    /// Theme overrides by category.
    pub fn theme_overrides(&self) -> &ThemeTokens {
        &self.theme
    }

    /// Extend tokens by category.
    pub fn extend_tokens(&self) -> &ThemeTokens {
        &self.extend
    }

    /// Plugin references in registration order.
    pub fn plugins(&self) -> &[PluginRef] {
        &self.plugins
    }

    /// Merges this configuration's theme layers into the framework defaults.
    pub fn resolve_theme(&self) -> ResolvedTheme {
        ResolvedTheme::merge(&default_tokens(), &self.theme, &self.extend)
    }
}

/// Builds a [`ConfigDescriptor`] from a file or inline source, then applies
/// environment and programmatic overrides before validating.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    source: Option<(String, Format)>,
    env_prefix: Option<String>,
    mode: ValidationMode,
    overrides: Vec<(String, String)>,
}

impl ConfigBuilder {
    /// Initialises a new `ConfigBuilder` instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the base configuration from a file.
    ///
    /// # Parameters
    /// - `path`: A `.toml`, `.json`, `.yaml` or `.yml` file.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Uses inline text as the base configuration. Ignored when a file is set.
    pub fn with_source<S: Into<String>>(
        mut self,
        source: S,
        format: Format,
    ) -> Self {
        self.source = Some((source.into(), format));
        self
    }

    /// Adds a prefix for environment variables that override configuration
    /// values.
    ///
    /// `<PREFIX>CONTENT` and `<PREFIX>PLUGINS` take comma-separated lists,
    /// so a glob set this way cannot itself contain a comma.
    /// `<PREFIX>THEME__<CATEGORY>__<NAME>` and
    /// `<PREFIX>EXTEND__<CATEGORY>__<NAME>` set single tokens.
    ///
    /// Variables whose names are not UTF-8 are skipped. A prefixed variable
    /// whose value is not UTF-8 fails the build.
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Sets how unknown token categories are handled.
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds a dotted-key override, applied after environment overrides.
    ///
    /// # Parameters
    /// - `key`: `content`, `plugins`, `theme.<category>.<name>` or
    ///   `extend.<category>.<name>`.
    /// - `value`: The new value. Lists are split on every comma, so
    ///   `content` globs set here cannot contain one.
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Loads, layers and validates the configuration.
    pub fn build(self) -> Result<ConfigDescriptor> {
        let mut raw = match (&self.config_file, self.source) {
            (Some(path), _) => load_raw(path)?,
            (None, Some((source, format))) => parse_raw(&source, format)?,
            (None, None) => RawDescriptor::default(),
        };

        if let Some(prefix) = &self.env_prefix {
            apply_env_overrides(&mut raw, prefix)?;
        }

        for (key, value) in &self.overrides {
            apply_override(&mut raw, key, value)?;
        }

        let descriptor = validate(raw, self.mode);
        match &self.config_file {
            Some(path) => descriptor.map_err(|e| e.with_path(path)),
            None => descriptor,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    #[serde(default)]
    content: Vec<String>,
    #[serde(default)]
    theme: RawTheme,
    #[serde(default)]
    plugins: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTheme {
    #[serde(default)]
    extend: BTreeMap<String, BTreeMap<TokenName, RawToken>>,
    #[serde(flatten)]
    categories: BTreeMap<String, BTreeMap<TokenName, RawToken>>,
}

/// A token value, or a nested scale such as `blue = { 100 = "..." }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawToken {
    Value(String),
    Scale(BTreeMap<TokenName, RawToken>),
}

/// A token name. YAML reads shade keys like `100` as integers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct TokenName(String);

impl<'de> Deserialize<'de> for TokenName {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct TokenNameVisitor;

        impl Visitor<'_> for TokenNameVisitor {
            type Value = TokenName;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a token name")
            }

            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> std::result::Result<TokenName, E> {
                Ok(TokenName(value.to_string()))
            }

            fn visit_string<E: de::Error>(
                self,
                value: String,
            ) -> std::result::Result<TokenName, E> {
                Ok(TokenName(value))
            }

            fn visit_u64<E: de::Error>(
                self,
                value: u64,
            ) -> std::result::Result<TokenName, E> {
                Ok(TokenName(value.to_string()))
            }

            fn visit_i64<E: de::Error>(
                self,
                value: i64,
            ) -> std::result::Result<TokenName, E> {
                Ok(TokenName(value.to_string()))
            }
        }

        deserializer.deserialize_any(TokenNameVisitor)
    }
}

fn load_raw(path: &Path) -> Result<RawDescriptor> {
    debug!("Loading configuration from {}", path.display());
    let format = Format::from_path(path)?;
    let source = fs::read_to_string(path)
        .map_err(|e| WindError::io(path.to_path_buf(), e))?;
    parse_raw(&source, format).map_err(|e| e.with_path(path))
}

fn parse_raw(source: &str, format: Format) -> Result<RawDescriptor> {
    match format {
        Format::Toml => toml::from_str(source).map_err(|e| {
            let (line, column) = match e.span() {
                Some(span) => {
                    let (line, column) = line_col(source, span.start);
                    (Some(line), Some(column))
                }
                None => (None, None),
            };
            WindError::parse(e.message().trim(), None, line, column)
        }),
        Format::Json => serde_json::from_str(source).map_err(|e| {
            WindError::parse(
                without_location(e.to_string()),
                None,
                Some(e.line()),
                Some(e.column()),
            )
        }),
        Format::Yaml => serde_yml::from_str(source).map_err(|e| {
            let location = e.location();
            WindError::parse(
                without_location(e.to_string()),
                None,
                location.as_ref().map(|l| l.line()),
                location.as_ref().map(|l| l.column()),
            )
        }),
    }
}

/// Cuts the message at the first "at line N column M" the parsers append.
fn without_location(message: String) -> String {
    match message.find(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message,
    }
}

/// One-based line and column of a byte offset.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    (line, column)
}

fn validate(raw: RawDescriptor, mode: ValidationMode) -> Result<ConfigDescriptor> {
    let content = raw
        .content
        .iter()
        .map(|pattern| ContentGlob::new(pattern))
        .collect::<Result<Vec<_>>>()?;
    if content.is_empty() {
        warn!("No content globs configured, generated CSS will be near-empty");
    }

    let theme = validate_tokens(&raw.theme.categories, mode)?;
    let extend = validate_tokens(&raw.theme.extend, mode)?;

    let plugins = raw
        .plugins
        .iter()
        .map(|reference| PluginRef::new(reference))
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Configuration loaded: {} content globs, {} plugins",
        content.len(),
        plugins.len()
    );

    Ok(ConfigDescriptor {
        content,
        theme,
        extend,
        plugins,
    })
}

fn validate_tokens(
    raw: &BTreeMap<String, BTreeMap<TokenName, RawToken>>,
    mode: ValidationMode,
) -> Result<ThemeTokens> {
    let mut tokens = ThemeTokens::new();
    for (key, entries) in raw {
        let category = match key.parse::<TokenCategory>() {
            Ok(category) => category,
            Err(e) => match mode {
                ValidationMode::Strict => return Err(e),
                ValidationMode::Lenient => {
                    warn!("Ignoring unknown token category `{}`", key);
                    continue;
                }
            },
        };
        flatten_tokens(None, entries, tokens.entry(category).or_default());
    }
    Ok(tokens)
}

/// Flattens nested scales into dash-joined names. A `DEFAULT` entry takes
/// the name of its parent.
fn flatten_tokens(
    prefix: Option<&str>,
    entries: &BTreeMap<TokenName, RawToken>,
    out: &mut TokenSet,
) {
    for (TokenName(name), token) in entries {
        let full = match prefix {
            Some(parent) if name == "DEFAULT" => parent.to_string(),
            Some(parent) => format!("{}-{}", parent, name),
            None => name.clone(),
        };
        match token {
            RawToken::Value(value) => {
                _ = out.insert(full, value.clone());
            }
            RawToken::Scale(scale) => flatten_tokens(Some(&full), scale, out),
        }
    }
}

fn apply_env_overrides(raw: &mut RawDescriptor, prefix: &str) -> Result<()> {
    for (key, value) in env::vars_os() {
        let Some(key) = key.to_str() else {
            continue;
        };
        let Some(stripped) = key.strip_prefix(prefix) else {
            continue;
        };
        let value = value.into_string().map_err(|_| {
            WindError::config(
                format!("Environment variable {} is not valid UTF-8", key),
                None,
            )
        })?;
        let config_key = stripped
            .trim_start_matches('_')
            .to_lowercase()
            .replace("__", ".");
        debug!("Applying environment override {}", key);
        apply_override(raw, &config_key, &value)?;
    }
    Ok(())
}

fn apply_override(raw: &mut RawDescriptor, key: &str, value: &str) -> Result<()> {
    match key {
        "content" => raw.content = split_list(value),
        "plugins" => raw.plugins = split_list(value),
        _ => {
            let mut parts = key.splitn(3, '.');
            let layer = match parts.next() {
                Some("theme") => &mut raw.theme.categories,
                Some("extend") => &mut raw.theme.extend,
                _ => {
                    return Err(WindError::config(
                        format!("Unknown configuration key: {}", key),
                        None,
                    ))
                }
            };
            let (category, name) = match (parts.next(), parts.next()) {
                (Some(category), Some(name))
                    if !category.is_empty() && !name.is_empty() =>
                {
                    (category, name)
                }
                _ => {
                    return Err(WindError::config(
                        format!(
                            "Override key `{}` must name a category and a token",
                            key
                        ),
                        None,
                    ))
                }
            };
            let category = category
                .parse::<TokenCategory>()
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|_| category.to_string());
            _ = layer
                .entry(category)
                .or_default()
                .insert(
                    TokenName(name.to_string()),
                    RawToken::Value(value.to_string()),
                );
        }
    }
    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tests for the configuration module.
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHIPPED_GLOBS: [&str; 2] =
        ["./templates/**/*.html", "./node_modules/flowbite/**/*.js"];

    fn globs(descriptor: &ConfigDescriptor) -> Vec<&str> {
        descriptor.content().iter().map(ContentGlob::as_str).collect()
    }

    #[test]
    fn test_default_mode_is_strict() {
        assert_eq!(ValidationMode::default(), ValidationMode::Strict);
    }

    #[test]
    fn test_bundled_descriptor() {
        let descriptor = ConfigDescriptor::bundled().unwrap();

        assert_eq!(globs(&descriptor), SHIPPED_GLOBS);
        assert_eq!(
            descriptor.theme_overrides()[&TokenCategory::Colors]["action"],
            "#5B4CA9"
        );
        assert!(descriptor.extend_tokens().is_empty());
        assert_eq!(descriptor.plugins().len(), 1);
        assert_eq!(descriptor.plugins()[0].as_str(), "flowbite/plugin");
    }

    #[test]
    fn test_loading_is_idempotent() {
        assert_eq!(
            ConfigDescriptor::bundled().unwrap(),
            ConfigDescriptor::bundled().unwrap()
        );
    }

    #[test]
    fn test_formats_agree() {
        let json = r##"{
            "content": ["./templates/**/*.html", "./node_modules/flowbite/**/*.js"],
            "theme": { "extend": {}, "colors": { "action": "#5B4CA9" } },
            "plugins": ["flowbite/plugin"]
        }"##;
        let yaml = r##"
content:
  - "./templates/**/*.html"
  - "./node_modules/flowbite/**/*.js"
theme:
  extend: {}
  colors:
    action: "#5B4CA9"
plugins:
  - flowbite/plugin
"##;
        let bundled = ConfigDescriptor::bundled().unwrap();
        assert_eq!(ConfigDescriptor::parse(json, Format::Json).unwrap(), bundled);
        assert_eq!(ConfigDescriptor::parse(yaml, Format::Yaml).unwrap(), bundled);

        let toml_scale = r##"
[theme.colors.brand]
DEFAULT = "#5B4CA9"
100 = "#ece9f7"
"##;
        let json_scale = r##"{
            "theme": { "colors": { "brand": { "DEFAULT": "#5B4CA9", "100": "#ece9f7" } } }
        }"##;
        let yaml_scale = r##"
theme:
  colors:
    brand:
      DEFAULT: "#5B4CA9"
      100: "#ece9f7"
"##;
        let scale = ConfigDescriptor::parse(toml_scale, Format::Toml).unwrap();
        assert_eq!(
            scale.theme_overrides()[&TokenCategory::Colors]["brand-100"],
            "#ece9f7"
        );
        assert_eq!(ConfigDescriptor::parse(json_scale, Format::Json).unwrap(), scale);
        assert_eq!(ConfigDescriptor::parse(yaml_scale, Format::Yaml).unwrap(), scale);
    }

    #[test]
    fn test_truncated_toml_reports_location() {
        let source = "content = [\n  \"./templates/**/*.html\",\n";
        match ConfigDescriptor::parse(source, Format::Toml) {
            Err(WindError::Parse { line, .. }) => assert!(line.is_some()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_json_fails() {
        let source = r#"{"content": ["./templates/**/*.html""#;
        match ConfigDescriptor::parse(source, Format::Json) {
            Err(WindError::Parse { line, column, .. }) => {
                assert_eq!(line, Some(1));
                assert!(column.is_some());
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_yaml_reports_location() {
        let source = "content:\n  - \"./templates/**/*.html\"\ntheme: {colors: [\n";
        match ConfigDescriptor::parse(source, Format::Yaml) {
            Err(WindError::Parse {
                message,
                line,
                column,
                ..
            }) => {
                assert!(line.is_some());
                assert!(column.is_some());
                assert!(!message.contains(" at line "));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_top_level_key_is_structural_error() {
        let result =
            ConfigDescriptor::parse("darkness = \"class\"\n", Format::Toml);
        assert!(matches!(result, Err(WindError::Parse { .. })));
    }

    #[test]
    fn test_unknown_category_strict_and_lenient() {
        let source = "[theme.gradients]\nsunset = \"orange\"\n[theme.colors]\naction = \"#5B4CA9\"\n";
        assert!(matches!(
            ConfigDescriptor::parse(source, Format::Toml),
            Err(WindError::UnknownCategory { .. })
        ));

        let descriptor = ConfigDescriptor::parse_with_mode(
            source,
            Format::Toml,
            ValidationMode::Lenient,
        )
        .unwrap();
        assert_eq!(descriptor.theme_overrides().len(), 1);
        assert!(descriptor
            .theme_overrides()
            .contains_key(&TokenCategory::Colors));
    }

    #[test]
    fn test_nested_scales_are_flattened() {
        let source = r##"
[theme.colors.brand]
DEFAULT = "#5B4CA9"
100 = "#ece9f7"
900 = "#1d1836"
"##;
        let descriptor = ConfigDescriptor::parse(source, Format::Toml).unwrap();
        let colors = &descriptor.theme_overrides()[&TokenCategory::Colors];
        assert_eq!(colors["brand"], "#5B4CA9");
        assert_eq!(colors["brand-100"], "#ece9f7");
        assert_eq!(colors["brand-900"], "#1d1836");
    }

    #[test]
    fn test_non_string_token_is_rejected() {
        let source = "[theme.fontWeight]\nbold = 700\n";
        assert!(matches!(
            ConfigDescriptor::parse(source, Format::Toml),
            Err(WindError::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_content_is_not_an_error() {
        let descriptor = ConfigDescriptor::parse("", Format::Toml).unwrap();
        assert!(descriptor.content().is_empty());
        assert!(descriptor.plugins().is_empty());
    }

    #[test]
    fn test_from_file_attaches_path_to_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("windcfg.toml");
        fs::write(&config_file, "content = [").unwrap();

        match ConfigDescriptor::from_file(&config_file) {
            Err(WindError::Parse { path, .. }) => {
                assert_eq!(path, Some(config_file))
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("windcfg.ini");
        fs::write(&config_file, "").unwrap();
        assert!(matches!(
            ConfigDescriptor::from_file(&config_file),
            Err(WindError::Config { .. })
        ));
    }

    #[test]
    fn test_apply_overrides() {
        let descriptor = ConfigBuilder::new()
            .with_source(BUNDLED_SOURCE, Format::Toml)
            .with_override("content", "./src/**/*.rs, ./templates/**/*.html")
            .with_override("theme.COLORS.action", "#000000")
            .with_override("extend.fontFamily.display", "Inter, sans-serif")
            .build()
            .unwrap();

        assert_eq!(
            globs(&descriptor),
            ["./src/**/*.rs", "./templates/**/*.html"]
        );
        let theme = descriptor.resolve_theme();
        assert_eq!(theme.get("colors.action"), Some("#000000"));
        assert_eq!(theme.get("fontFamily.display"), Some("Inter, sans-serif"));
    }

    #[test]
    fn test_unknown_override_key() {
        let result = ConfigBuilder::new()
            .with_override("darkMode", "class")
            .build();
        assert!(matches!(result, Err(WindError::Config { .. })));

        let result = ConfigBuilder::new()
            .with_override("theme.colors", "#fff")
            .build();
        assert!(matches!(result, Err(WindError::Config { .. })));
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("WCTEST_PLUGINS", "forms-plugin,typography");
        env::set_var("WCTEST_THEME__COLORS__ACTION", "#123456");

        let descriptor = ConfigBuilder::new()
            .with_source(BUNDLED_SOURCE, Format::Toml)
            .with_env_prefix("WCTEST_")
            .build()
            .unwrap();

        let plugins: Vec<&str> =
            descriptor.plugins().iter().map(PluginRef::as_str).collect();
        assert_eq!(plugins, ["forms-plugin", "typography"]);
        assert_eq!(
            descriptor.resolve_theme().get("colors.action"),
            Some("#123456")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_env_overrides_tolerate_foreign_non_utf8_variables() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("WCJUNK_BYTES", OsStr::from_bytes(b"\xff\xfe"));

        let descriptor = ConfigBuilder::new()
            .with_source(BUNDLED_SOURCE, Format::Toml)
            .with_env_prefix("WCCLEAN_")
            .build()
            .unwrap();
        assert_eq!(descriptor, ConfigDescriptor::bundled().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_env_override_with_non_utf8_value_fails() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("WCBYTES_PLUGINS", OsStr::from_bytes(b"\xff\xfe"));

        let result = ConfigBuilder::new()
            .with_source(BUNDLED_SOURCE, Format::Toml)
            .with_env_prefix("WCBYTES_")
            .build();
        assert!(matches!(result, Err(WindError::Config { .. })));
    }

    #[test]
    fn test_line_col() {
        assert_eq!(line_col("abc", 0), (1, 1));
        assert_eq!(line_col("ab\ncd", 4), (2, 2));
    }
}
