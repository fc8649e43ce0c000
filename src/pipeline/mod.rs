//! Pipeline orchestration for compliance runs.
//!
//! Shared parse → evaluate → report stages used by the CLI handlers.

mod output;
mod parse;
mod report_stage;

pub use output::{should_use_color, write_output, OutputTarget};
pub use parse::parse_sbom_with_context;
pub use report_stage::output_report;

use crate::compliance::{ComplianceReport, StandardKind};
use crate::model::NormalizedSbom;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse an SBOM file
    #[error("Parse failed for {path}: {source}")]
    ParseFailed {
        path: String,
        source: anyhow::Error,
    },

    /// The standard could not be evaluated
    #[error("Compliance evaluation failed: {source}")]
    EvaluationFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Evaluate a parsed document against one standard.
pub fn evaluate_standard(
    sbom: &NormalizedSbom,
    standard: StandardKind,
) -> Result<ComplianceReport, PipelineError> {
    let report = standard
        .evaluate(sbom)
        .map_err(|e| PipelineError::EvaluationFailed { source: e.into() })?;

    tracing::info!(
        standard = %standard,
        sections = report.sections.len(),
        "Score {:.1} (required {:.1}, optional {:.1})",
        report.summary.total_score,
        report.summary.required_elements_score,
        report.summary.optional_elements_score
    );
    Ok(report)
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Report produced and, if a minimum was set, it was met
    pub const SUCCESS: i32 = 0;
    /// Total score is below `--min-score`
    pub const BELOW_MIN_SCORE: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::BELOW_MIN_SCORE, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_evaluate_empty_document() {
        let report = evaluate_standard(&NormalizedSbom::default(), StandardKind::Ntia).unwrap();
        assert!(!report.sections.is_empty());
        assert!(report.summary.total_score < 10.0);
    }
}
