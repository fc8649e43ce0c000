//! Report rendering for compliance results.
//!
//! Three formats are provided:
//! - JSON: the full section list with run and tool metadata
//! - Basic: a two-line score summary for shell use
//! - Table: aligned per-section rows for terminal review

mod basic;
mod json;
mod table;
mod types;

pub use basic::BasicReporter;
pub use json::JsonReporter;
pub use table::TableReporter;
pub use types::{ReportConfig, ReportFormat};

use crate::compliance::ComplianceReport;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a compliance report
    fn generate(
        &self,
        report: &ComplianceReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write the rendered report to a writer
    fn write_report(
        &self,
        report: &ComplianceReport,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let rendered = self.generate(report, config)?;
        writer.write_all(rendered.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Basic => Box::new(BasicReporter),
        ReportFormat::Table => Box::new(TableReporter::new()),
    }
}

/// Apply ANSI color formatting if colored output is enabled.
pub(crate) fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Color for a 0-10 score
pub(crate) fn score_color(score: f64) -> &'static str {
    if score >= 8.0 {
        "green"
    } else if score >= 5.0 {
        "yellow"
    } else {
        "red"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_color_thresholds() {
        assert_eq!(score_color(10.0), "green");
        assert_eq!(score_color(8.0), "green");
        assert_eq!(score_color(7.9), "yellow");
        assert_eq!(score_color(5.0), "yellow");
        assert_eq!(score_color(4.99), "red");
    }

    #[test]
    fn test_ansi_color_disabled() {
        assert_eq!(ansi_color("x", "red", false), "x");
        assert_eq!(ansi_color("x", "red", true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_create_reporter_formats() {
        for format in [ReportFormat::Json, ReportFormat::Basic, ReportFormat::Table] {
            assert_eq!(create_reporter(format).format(), format);
        }
    }
}
