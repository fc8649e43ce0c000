//! Score-only report for shell output.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::compliance::ComplianceReport;

/// Two-line summary: the standard name, then the three scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicReporter;

impl ReportGenerator for BasicReporter {
    fn generate(
        &self,
        report: &ComplianceReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let summary = &report.summary;
        Ok(format!(
            "{} Compliance Report\nScore:{:.1} RequiredScore:{:.1} OptionalScore:{:.1} for {}\n",
            report.descriptor.short_name,
            summary.total_score,
            summary.required_elements_score,
            summary.optional_elements_score,
            config.file_name
        ))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Basic
    }
}
