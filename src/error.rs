//! Unified error types for sbom-compliance.
//!
//! The record store and scoring functions are total and never fail. Errors
//! come from the layers around them: reading documents, resolving standards,
//! building report sections and writing output.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-compliance operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomComplianceError {
    /// Errors while reading an SBOM document
    #[error("Failed to parse SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors while evaluating a standard
    #[error("Compliance evaluation failed: {context}")]
    Compliance {
        context: String,
        #[source]
        source: ComplianceErrorKind,
    },

    /// Errors while rendering a report
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Unknown SBOM format - expected CycloneDX or SPDX markers")]
    UnknownFormat,

    #[error("Unsupported format version: {version} (supported: {supported})")]
    UnsupportedVersion { version: String, supported: String },

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("CycloneDX parsing error: {0}")]
    CycloneDx(String),

    #[error("SPDX parsing error: {0}")]
    Spdx(String),
}

/// Specific compliance error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ComplianceErrorKind {
    #[error("Unknown standard '{0}' (expected one of: ntia, bsi, bsi-v2, oct, fsct)")]
    UnknownStandard(String),

    #[error("No section metadata for check '{key}' in standard {standard}")]
    MissingSectionMetadata { standard: String, key: String },
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),

    #[error("Output format not supported for this operation: {0}")]
    UnsupportedFormat(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-compliance operations
pub type Result<T> = std::result::Result<T, SbomComplianceError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SbomComplianceError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for unknown format
    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::parse(format!("at {}", path.into()), ParseErrorKind::UnknownFormat)
    }

    /// Create a compliance error with context
    pub fn compliance(context: impl Into<String>, source: ComplianceErrorKind) -> Self {
        Self::Compliance {
            context: context.into(),
            source,
        }
    }

    /// A check key reached the section builder without a metadata row.
    pub fn missing_section_metadata(standard: impl Into<String>, key: impl Into<String>) -> Self {
        let standard = standard.into();
        Self::compliance(
            format!("building sections for {standard}"),
            ComplianceErrorKind::MissingSectionMetadata {
                standard,
                key: key.into(),
            },
        )
    }

    /// Create an unknown-standard error
    pub fn unknown_standard(name: impl Into<String>) -> Self {
        Self::compliance(
            "resolving standard",
            ComplianceErrorKind::UnknownStandard(name.into()),
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SbomComplianceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SbomComplianceError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<crate::parsers::ParseError> for SbomComplianceError {
    fn from(err: crate::parsers::ParseError) -> Self {
        use crate::parsers::ParseError;
        match err {
            ParseError::IoError(msg) => Self::Io {
                path: None,
                message: msg.clone(),
                source: std::io::Error::other(msg),
            },
            ParseError::JsonError(msg) => Self::parse("", ParseErrorKind::InvalidJson(msg)),
            ParseError::UnknownFormat(msg) => Self::parse(msg, ParseErrorKind::UnknownFormat),
            ParseError::UnsupportedVersion(version) => Self::parse(
                "",
                ParseErrorKind::UnsupportedVersion {
                    version,
                    supported: "CycloneDX 1.4-1.6, SPDX 2.2-2.3".to_string(),
                },
            ),
            ParseError::MissingField(field) => Self::parse(
                "",
                ParseErrorKind::MissingField {
                    field,
                    context: "document".to_string(),
                },
            ),
            ParseError::InvalidStructure(msg) => Self::parse("", ParseErrorKind::Spdx(msg)),
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost first, so an error raised while
/// reading a component and surfaced by the pipeline reads
/// `"parsing sbom.json: reading component: <cause>"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on the error path.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomComplianceError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: SbomComplianceError, new_ctx: &str) -> SbomComplianceError {
    match err {
        SbomComplianceError::Parse {
            context: existing,
            source,
        } => SbomComplianceError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomComplianceError::Compliance {
            context: existing,
            source,
        } => SbomComplianceError::Compliance {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomComplianceError::Report {
            context: existing,
            source,
        } => SbomComplianceError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomComplianceError::Io {
            path,
            message,
            source,
        } => SbomComplianceError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomComplianceError::Config(msg) => {
            SbomComplianceError::Config(chain_context(new_ctx, &msg))
        }
        SbomComplianceError::Validation(msg) => {
            SbomComplianceError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Returns `"new: existing"`, or just `new` when nothing was recorded yet.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SbomComplianceError::unknown_format("test.json");
        let display = err.to_string();
        assert!(display.contains("SBOM"), "unexpected message: {display}");

        let err = SbomComplianceError::unknown_standard("iso");
        assert!(err.to_string().contains("resolving standard"));
    }

    #[test]
    fn test_missing_metadata_names_key_and_standard() {
        let err = SbomComplianceError::missing_section_metadata("NTIA", "CompName");
        match err {
            SbomComplianceError::Compliance {
                source: ComplianceErrorKind::MissingSectionMetadata { standard, key },
                ..
            } => {
                assert_eq!(standard, "NTIA");
                assert_eq!(key, "CompName");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SbomComplianceError::io("/path/to/file.json", io_err);
        assert!(err.to_string().contains("/path/to/file.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(SbomComplianceError::parse(
                "base",
                ParseErrorKind::UnknownFormat,
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(SbomComplianceError::Parse { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called);

        let err_result: Result<i32> = Err(SbomComplianceError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called);
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
