//! Report output stage.

use super::{should_use_color, write_output, OutputTarget, PipelineError};
use crate::compliance::ComplianceReport;
use crate::config::OutputConfig;
use crate::reports::{create_reporter, ReportConfig};
use std::path::Path;

/// Render a compliance report and write it to the configured destination.
///
/// `source` is the evaluated document's path as given by the user; it is
/// echoed in the rendered report.
pub fn output_report(
    report: &ComplianceReport,
    source: &Path,
    output: &OutputConfig,
    quiet: bool,
) -> Result<(), PipelineError> {
    let target = OutputTarget::from_option(output.file.clone());
    let report_config = ReportConfig::new(source.display().to_string())
        .with_color(should_use_color(output.no_color, &target));

    let reporter = create_reporter(output.format);
    tracing::debug!(format = %reporter.format(), "Rendering report");

    let rendered = reporter
        .generate(report, &report_config)
        .map_err(|e| PipelineError::ReportFailed { source: e.into() })?;

    write_output(&rendered, &target, quiet).map_err(|source| PipelineError::ReportFailed { source })
}
