//! Configuration types for compliance runs.

use crate::compliance::StandardKind;
use crate::error::Result;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Standard evaluated when neither the config file nor the CLI picks one.
pub const DEFAULT_STANDARD: &str = "ntia";

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Top-level configuration, loaded from a YAML file and layered under CLI flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Which standard to evaluate and what counts as passing
    pub compliance: ComplianceConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the configured standard name.
    pub fn standard(&self) -> Result<StandardKind> {
        self.compliance.standard.parse()
    }
}

// ============================================================================
// Section Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Standard name: ntia, bsi, bsi-v2, oct or fsct
    pub standard: String,
    /// Exit with a failure code when the total score is below this (0-10)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            standard: DEFAULT_STANDARD.to_string(),
            min_score: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: ReportFormat,
    /// Write the report here instead of stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable ANSI colors
    pub no_color: bool,
}

/// Values given explicitly on the command line.
///
/// Every field is optional so an unset flag never masks a config file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub standard: Option<StandardKind>,
    pub min_score: Option<f64>,
    pub format: Option<ReportFormat>,
    pub file: Option<PathBuf>,
    pub no_color: bool,
}
