//! Report type definitions.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for compliance reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Structured JSON output
    Json,
    /// Score line only
    #[default]
    Basic,
    /// Aligned per-section table (colored)
    #[value(alias = "detailed")]
    Table,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Basic => write!(f, "basic"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// Per-run information the renderers need besides the report itself
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Path of the evaluated document, as given on the command line
    pub file_name: String,
    /// Emit ANSI colour codes
    pub colored: bool,
}

impl ReportConfig {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            colored: false,
        }
    }

    #[must_use]
    pub const fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }
}
