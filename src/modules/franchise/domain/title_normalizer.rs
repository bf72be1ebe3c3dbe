use std::fmt;

use regex::Regex;

use crate::shared::errors::AppResult;

/// Transformation that can be applied to a title
///
/// Each transformation is composable and testable in isolation.
pub trait TitleTransformation: Send + Sync {
    fn transform(&self, title: &str) -> String;
    fn name(&self) -> &'static str;
}

/// Converts title to lowercase
#[derive(Debug, Clone)]
pub struct LowercaseTransform;

impl TitleTransformation for LowercaseTransform {
    fn transform(&self, title: &str) -> String {
        title.to_lowercase()
    }

    fn name(&self) -> &'static str {
        "Lowercase"
    }
}

/// Replaces every match of a regular expression
#[derive(Debug, Clone)]
pub struct PatternStripTransform {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl PatternStripTransform {
    pub fn new(name: &'static str, pattern: &str, replacement: &'static str) -> AppResult<Self> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            replacement,
        })
    }
}

impl TitleTransformation for PatternStripTransform {
    fn transform(&self, title: &str) -> String {
        self.pattern.replace_all(title, self.replacement).into_owned()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Keeps only `[a-z0-9]` and whitespace
#[derive(Debug, Clone)]
pub struct AsciiAlphanumericTransform;

impl TitleTransformation for AsciiAlphanumericTransform {
    fn transform(&self, title: &str) -> String {
        title
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
            .collect()
    }

    fn name(&self) -> &'static str {
        "AsciiAlphanumeric"
    }
}

/// Normalizes whitespace (collapses multiple spaces, trims)
#[derive(Debug, Clone)]
pub struct NormalizeWhitespaceTransform;

impl TitleTransformation for NormalizeWhitespaceTransform {
    fn transform(&self, title: &str) -> String {
        title.split_whitespace().collect::<Vec<&str>>().join(" ")
    }

    fn name(&self) -> &'static str {
        "NormalizeWhitespace"
    }
}

// Applied to lower-cased titles, in this order.
const SEASON_NUMBER: &str = r"\b(?:season|part|cour)\s*\d+\b";
const ORDINAL_SEASON: &str = r"\b\d+(?:st|nd|rd|th)\s+(?:season|cour|part)\b";
const ROMAN_NUMERAL: &str = r"\b(?:ii|iii|iv|v|vi)\b";
const DELIMITED_SUFFIX: &str = r"\s*[:\-]\s*(?:part|season)\s+\w+";
const TRAILING_NUMBER: &str = r"\s+\d{1,2}\s*$";
const CONTINUATION_MARKER: &str =
    r"\b(?:the\s+)?(?:final(?:\s+season)?|continuation|kanketsu-hen|recap|prologue|epilogue)\b";

/// Title normalizer that applies a pipeline of transformations
///
/// Uses the builder pattern for composability and testability.
pub struct TitleNormalizer {
    transformations: Vec<Box<dyn TitleTransformation>>,
}

impl TitleNormalizer {
    /// Create a new empty normalizer
    pub fn new() -> Self {
        Self {
            transformations: Vec::new(),
        }
    }

    /// Pipeline reducing a title to its franchise base name
    ///
    /// "Frieren Season 2", "Frieren 2nd Season" and "Frieren" all become
    /// "frieren".
    pub fn franchise_pipeline() -> AppResult<Self> {
        Ok(Self::new()
            .with_lowercase()
            .with_pattern("StripSeasonNumber", SEASON_NUMBER, " ")?
            .with_pattern("StripOrdinalSeason", ORDINAL_SEASON, " ")?
            .with_pattern("StripRomanNumeral", ROMAN_NUMERAL, " ")?
            .with_pattern("StripDelimitedSuffix", DELIMITED_SUFFIX, " ")?
            .with_pattern("StripTrailingNumber", TRAILING_NUMBER, "")?
            .with_pattern("StripContinuationMarker", CONTINUATION_MARKER, " ")?
            .with_ascii_alphanumeric()
            .with_normalize_whitespace())
    }

    /// Add lowercase transformation
    pub fn with_lowercase(mut self) -> Self {
        self.transformations.push(Box::new(LowercaseTransform));
        self
    }

    /// Add a regex replacement
    pub fn with_pattern(
        mut self,
        name: &'static str,
        pattern: &str,
        replacement: &'static str,
    ) -> AppResult<Self> {
        self.transformations
            .push(Box::new(PatternStripTransform::new(name, pattern, replacement)?));
        Ok(self)
    }

    /// Add `[a-z0-9\s]` filtering
    pub fn with_ascii_alphanumeric(mut self) -> Self {
        self.transformations.push(Box::new(AsciiAlphanumericTransform));
        self
    }

    /// Add whitespace normalization transformation
    pub fn with_normalize_whitespace(mut self) -> Self {
        self.transformations
            .push(Box::new(NormalizeWhitespaceTransform));
        self
    }

    /// Apply all transformations to the title
    pub fn normalize(&self, title: &str) -> String {
        let mut result = title.to_string();

        for transformation in &self.transformations {
            result = transformation.transform(&result);
            log::trace!("After {}: '{}'", transformation.name(), result);
        }

        result
    }

    /// Normalized key, or the lower-cased title when nothing survives
    ///
    /// Titles written entirely in non-Latin script would otherwise all
    /// collapse into one empty key.
    pub fn normalize_or_lowercase(&self, title: &str) -> String {
        let normalized = self.normalize(title);
        if normalized.is_empty() {
            title.to_lowercase()
        } else {
            normalized
        }
    }

    /// Get the number of transformations in the pipeline
    pub fn transformation_count(&self) -> usize {
        self.transformations.len()
    }
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TitleNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.transformations.iter().map(|t| t.name()))
            .finish()
    }
}
