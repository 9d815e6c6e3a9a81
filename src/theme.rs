//! # Theme Module
//!
//! Design tokens and the merge that turns a configuration's `theme` and
//! `theme.extend` sections into the token set handed to CSS generation.
//!
//! ## Merge order
//!
//! 1. The framework defaults from [`default_tokens`].
//! 2. Theme overrides, key by key. Defaults for keys that are not named
//!    stay untouched.
//! 3. Extend tokens, key by key, after overrides.
//!
//! Each resolved token remembers which layer supplied it, see
//! [`TokenSource`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WindError};

/// Token names to values within one category.
pub type TokenSet = BTreeMap<String, String>;

/// Token categories to their token sets.
pub type ThemeTokens = BTreeMap<TokenCategory, TokenSet>;

/// The design-token categories a configuration may override or extend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum TokenCategory {
    /// Colour palette.
    Colors,
    /// Spacing scale used by padding, margin, gap and sizing utilities.
    Spacing,
    /// Responsive breakpoints.
    Screens,
    /// Font family stacks.
    FontFamily,
    /// Font sizes.
    FontSize,
    /// Font weights.
    FontWeight,
    /// Line heights.
    LineHeight,
    /// Letter spacing.
    LetterSpacing,
    /// Border radii.
    BorderRadius,
    /// Border widths.
    BorderWidth,
    /// Box shadows.
    BoxShadow,
    /// Opacity steps.
    Opacity,
    /// Z-index layers.
    ZIndex,
}

impl TokenCategory {
    /// Every category, in declaration order.
    pub const ALL: [TokenCategory; 13] = [
        TokenCategory::Colors,
        TokenCategory::Spacing,
        TokenCategory::Screens,
        TokenCategory::FontFamily,
        TokenCategory::FontSize,
        TokenCategory::FontWeight,
        TokenCategory::LineHeight,
        TokenCategory::LetterSpacing,
        TokenCategory::BorderRadius,
        TokenCategory::BorderWidth,
        TokenCategory::BoxShadow,
        TokenCategory::Opacity,
        TokenCategory::ZIndex,
    ];

    /// The configuration key for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenCategory::Colors => "colors",
            TokenCategory::Spacing => "spacing",
            TokenCategory::Screens => "screens",
            TokenCategory::FontFamily => "fontFamily",
            TokenCategory::FontSize => "fontSize",
            TokenCategory::FontWeight => "fontWeight",
            TokenCategory::LineHeight => "lineHeight",
            TokenCategory::LetterSpacing => "letterSpacing",
            TokenCategory::BorderRadius => "borderRadius",
            TokenCategory::BorderWidth => "borderWidth",
            TokenCategory::BoxShadow => "boxShadow",
            TokenCategory::Opacity => "opacity",
            TokenCategory::ZIndex => "zIndex",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenCategory {
    type Err = WindError;

    /// Parses a category key. Matching ignores ASCII case so that keys
    /// arriving through environment variables still resolve.
    fn from_str(s: &str) -> Result<Self> {
        TokenCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| WindError::UnknownCategory {
                category: s.to_string(),
            })
    }
}

/// The layer that supplied a resolved token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    /// Framework default.
    Default,
    /// Theme override.
    Override,
    /// Extend token.
    Extend,
}

/// A resolved design token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The token value as emitted into CSS.
    pub value: String,
    /// Where the value came from.
    pub source: TokenSource,
}

/// The merged theme for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedTheme {
    tokens: BTreeMap<TokenCategory, BTreeMap<String, Token>>,
}

impl ResolvedTheme {
    /// Merges overrides and extend tokens into `defaults`.
    ///
    /// Both layers are applied key by key, so a category named in the
    /// overrides keeps every default it does not mention.
    pub fn merge(
        defaults: &ThemeTokens,
        overrides: &ThemeTokens,
        extend: &ThemeTokens,
    ) -> Self {
        let mut theme = ResolvedTheme::default();
        theme.apply(defaults, TokenSource::Default);
        theme.apply(overrides, TokenSource::Override);
        theme.apply(extend, TokenSource::Extend);
        theme
    }

    fn apply(&mut self, layer: &ThemeTokens, source: TokenSource) {
        for (category, set) in layer {
            let bucket = self.tokens.entry(*category).or_default();
            for (name, value) in set {
                _ = bucket.insert(
                    name.clone(),
                    Token {
                        value: value.clone(),
                        source,
                    },
                );
            }
        }
    }

    /// Looks up a token in a category.
    pub fn token(&self, category: TokenCategory, name: &str) -> Option<&Token> {
        self.tokens.get(&category).and_then(|set| set.get(name))
    }

    /// Looks up a token value by dotted path, e.g. `colors.action`.
    ///
    /// Returns `None` for malformed paths, unknown categories and missing
    /// tokens.
    pub fn get(&self, path: &str) -> Option<&str> {
        let (category, name) = path.split_once('.')?;
        let category = category.parse().ok()?;
        self.token(category, name).map(|token| token.value.as_str())
    }

    /// Iterates the tokens of one category in name order.
    pub fn category(
        &self,
        category: TokenCategory,
    ) -> impl Iterator<Item = (&str, &Token)> {
        self.tokens
            .get(&category)
            .into_iter()
            .flat_map(|set| set.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Strips provenance, leaving plain token values.
    pub fn values(&self) -> ThemeTokens {
        self.tokens
            .iter()
            .map(|(category, set)| {
                let values = set
                    .iter()
                    .map(|(name, token)| (name.clone(), token.value.clone()))
                    .collect();
                (*category, values)
            })
            .collect()
    }

    /// Total number of resolved tokens.
    pub fn len(&self) -> usize {
        self.tokens.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` when no tokens are defined.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const DEFAULT_COLORS: &[(&str, &str)] = &[
    ("transparent", "transparent"),
    ("current", "currentColor"),
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("gray-100", "#f3f4f6"),
    ("gray-300", "#d1d5db"),
    ("gray-500", "#6b7280"),
    ("gray-700", "#374151"),
    ("gray-900", "#111827"),
    ("red-500", "#ef4444"),
    ("green-500", "#22c55e"),
    ("blue-500", "#3b82f6"),
    ("purple-500", "#a855f7"),
];

const DEFAULT_SPACING: &[(&str, &str)] = &[
    ("0", "0px"),
    ("px", "1px"),
    ("1", "0.25rem"),
    ("2", "0.5rem"),
    ("4", "1rem"),
    ("8", "2rem"),
    ("16", "4rem"),
];

const DEFAULT_SCREENS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
    ("2xl", "1536px"),
];

const DEFAULT_FONT_FAMILY: &[(&str, &str)] = &[
    ("sans", "ui-sans-serif, system-ui, sans-serif"),
    ("serif", "ui-serif, Georgia, serif"),
    ("mono", "ui-monospace, SFMono-Regular, monospace"),
];

const DEFAULT_FONT_SIZE: &[(&str, &str)] = &[
    ("xs", "0.75rem"),
    ("sm", "0.875rem"),
    ("base", "1rem"),
    ("lg", "1.125rem"),
    ("xl", "1.25rem"),
];

const DEFAULT_FONT_WEIGHT: &[(&str, &str)] = &[
    ("normal", "400"),
    ("medium", "500"),
    ("semibold", "600"),
    ("bold", "700"),
];

const DEFAULT_LINE_HEIGHT: &[(&str, &str)] = &[
    ("none", "1"),
    ("tight", "1.25"),
    ("normal", "1.5"),
    ("loose", "2"),
];

const DEFAULT_LETTER_SPACING: &[(&str, &str)] = &[
    ("tight", "-0.025em"),
    ("normal", "0em"),
    ("wide", "0.025em"),
];

const DEFAULT_BORDER_RADIUS: &[(&str, &str)] = &[
    ("none", "0px"),
    ("DEFAULT", "0.25rem"),
    ("lg", "0.5rem"),
    ("full", "9999px"),
];

const DEFAULT_BORDER_WIDTH: &[(&str, &str)] =
    &[("0", "0px"), ("DEFAULT", "1px"), ("2", "2px"), ("4", "4px")];

const DEFAULT_BOX_SHADOW: &[(&str, &str)] = &[
    ("sm", "0 1px 2px 0 rgb(0 0 0 / 0.05)"),
    ("DEFAULT", "0 1px 3px 0 rgb(0 0 0 / 0.1)"),
    ("none", "none"),
];

const DEFAULT_OPACITY: &[(&str, &str)] =
    &[("0", "0"), ("50", "0.5"), ("100", "1")];

const DEFAULT_Z_INDEX: &[(&str, &str)] =
    &[("0", "0"), ("10", "10"), ("50", "50"), ("auto", "auto")];

/// Returns the framework's default design tokens.
///
/// The set is rebuilt on each call and is identical every time.
pub fn default_tokens() -> ThemeTokens {
    TokenCategory::ALL
        .iter()
        .map(|category| {
            let entries = match category {
                TokenCategory::Colors => DEFAULT_COLORS,
                TokenCategory::Spacing => DEFAULT_SPACING,
                TokenCategory::Screens => DEFAULT_SCREENS,
                TokenCategory::FontFamily => DEFAULT_FONT_FAMILY,
                TokenCategory::FontSize => DEFAULT_FONT_SIZE,
                TokenCategory::FontWeight => DEFAULT_FONT_WEIGHT,
                TokenCategory::LineHeight => DEFAULT_LINE_HEIGHT,
                TokenCategory::LetterSpacing => DEFAULT_LETTER_SPACING,
                TokenCategory::BorderRadius => DEFAULT_BORDER_RADIUS,
                TokenCategory::BorderWidth => DEFAULT_BORDER_WIDTH,
                TokenCategory::BoxShadow => DEFAULT_BOX_SHADOW,
                TokenCategory::Opacity => DEFAULT_OPACITY,
                TokenCategory::ZIndex => DEFAULT_Z_INDEX,
            };
            let set = entries
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            (*category, set)
        })
        .collect()
}
