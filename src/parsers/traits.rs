//! Parser trait definitions and error types.

use crate::model::NormalizedSbom;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during SBOM parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("JSON parse error: {0}")]
    JsonError(String),

    #[error("Invalid SBOM structure: {0}")]
    InvalidStructure(String),

    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(String),

    #[error("Unknown SBOM format: {0}")]
    UnknownFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

/// Confidence level for format detection
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FormatConfidence(f32);

impl FormatConfidence {
    /// Definitely not this format
    pub const NONE: Self = Self(0.0);
    /// Might be this format
    pub const LOW: Self = Self(0.25);
    /// Likely this format
    pub const MEDIUM: Self = Self(0.5);
    /// Almost certainly this format
    pub const HIGH: Self = Self(0.75);
    /// Definitely this format
    pub const CERTAIN: Self = Self(1.0);

    #[must_use]
    pub const fn value(&self) -> f32 {
        self.0
    }

    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.0 >= Self::LOW.0
    }
}

impl Default for FormatConfidence {
    fn default() -> Self {
        Self::NONE
    }
}

/// Detection result from a parser
#[derive(Debug, Clone)]
pub struct FormatDetection {
    pub confidence: FormatConfidence,
    /// "JSON" or "tag-value"
    pub variant: Option<String>,
    pub version: Option<String>,
    pub warnings: Vec<String>,
}

impl FormatDetection {
    #[must_use]
    pub const fn no_match() -> Self {
        Self::with_confidence(FormatConfidence::NONE)
    }

    #[must_use]
    pub const fn with_confidence(confidence: FormatConfidence) -> Self {
        Self {
            confidence,
            variant: None,
            version: None,
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn variant(mut self, variant: &str) -> Self {
        self.variant = Some(variant.to_string());
        self
    }

    #[must_use]
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    #[must_use]
    pub fn warning(mut self, warning: &str) -> Self {
        self.warnings.push(warning.to_string());
        self
    }
}

/// Trait for SBOM format parsers
///
/// `detect()` is a cheap structural sniff, so the detector can pick a parser
/// without trial-and-error parsing.
pub trait SbomParser {
    /// Parse SBOM from a file path
    fn parse(&self, path: &Path) -> Result<NormalizedSbom, ParseError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Parse SBOM from string content
    fn parse_str(&self, content: &str) -> Result<NormalizedSbom, ParseError>;

    /// Supported specification versions
    fn supported_versions(&self) -> Vec<&str>;

    fn format_name(&self) -> &str;

    /// Detect if this parser can handle the given content
    fn detect(&self, content: &str) -> FormatDetection;

    fn can_parse(&self, content: &str) -> bool {
        self.detect(content).confidence.can_parse()
    }

    fn confidence(&self, content: &str) -> FormatConfidence {
        self.detect(content).confidence
    }
}

/// Pull the first quoted value that follows `"key":` without a full parse.
pub(crate) fn sniff_json_string(content: &str, key: &str) -> Option<String> {
    let needle = format!("\"{key}\"");
    let idx = content.find(&needle)?;
    let after = &content[idx + needle.len()..];
    let colon_idx = after.find(':')?;
    let value_part = &after[colon_idx + 1..];
    let quote_start = value_part.find('"')?;
    let after_quote = &value_part[quote_start + 1..];
    let quote_end = after_quote.find('"')?;
    Some(after_quote[..quote_end].to_string())
}

/// Parse an RFC 3339 timestamp, logging and discarding anything malformed.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<chrono::DateTime<chrono::Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&chrono::Utc)),
        Err(e) => {
            tracing::warn!(timestamp = raw, "Ignoring unparsable timestamp: {e}");
            None
        }
    }
}
