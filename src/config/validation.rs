//! Configuration validation.
//!
//! Runs before any document is read, so a bad config never produces a
//! partial report.

use super::types::{AppConfig, ComplianceConfig, OutputConfig};
use crate::compliance::{StandardKind, MAX_SCORE};
use std::str::FromStr;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.compliance.validate();
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ComplianceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = StandardKind::from_str(&self.standard) {
            let known: Vec<_> = StandardKind::all().iter().map(|s| s.cli_name()).collect();
            errors.push(ConfigError::new(
                "compliance.standard",
                format!("{e} (expected one of: {})", known.join(", ")),
            ));
        }

        if let Some(min) = self.min_score {
            if !(0.0..=MAX_SCORE).contains(&min) {
                errors.push(ConfigError::new(
                    "compliance.min_score",
                    format!("must be between 0 and {MAX_SCORE}, got {min}"),
                ));
            }
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if file_path.as_os_str().is_empty() || file_path.file_name().is_none() {
                errors.push(ConfigError::new("output.file", "file name must not be empty"));
            } else if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_unknown_standard_rejected() {
        let config = ComplianceConfig {
            standard: "cra".into(),
            min_score: None,
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "compliance.standard");
        assert!(errors[0].message.contains("bsi-v2"));
    }

    #[test]
    fn test_standard_aliases_accepted() {
        for name in ["NTIA", "bsi-v1.1", "openchain-telco", "fsct-v3"] {
            let config = ComplianceConfig {
                standard: name.into(),
                min_score: None,
            };
            assert!(config.is_valid(), "{name} should be accepted");
        }
    }

    #[test]
    fn test_min_score_range() {
        for (score, ok) in [(0.0, true), (10.0, true), (7.25, true), (-0.1, false), (10.5, false)] {
            let config = ComplianceConfig {
                standard: "ntia".into(),
                min_score: Some(score),
            };
            assert_eq!(config.is_valid(), ok, "min_score {score}");
        }
    }

    #[test]
    fn test_nan_min_score_rejected() {
        let config = ComplianceConfig {
            standard: "ntia".into(),
            min_score: Some(f64::NAN),
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_empty_output_file_rejected() {
        let config = OutputConfig {
            file: Some(PathBuf::new()),
            ..OutputConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "output.file: file name must not be empty");
    }

    #[test]
    fn test_missing_parent_directory_rejected() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/definitely/not/here/report.json")),
            ..OutputConfig::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_errors_from_all_sections_collected() {
        let mut config = AppConfig::default();
        config.compliance.standard = "nope".into();
        config.output.file = Some(PathBuf::new());
        assert_eq!(config.validate().len(), 2);
    }
}
