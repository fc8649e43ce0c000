//! Compliance command handler.
//!
//! Implements the `compliance` subcommand: validate the effective config,
//! parse the document, evaluate one standard and render the report.

use crate::config::{AppConfig, Validatable};
use crate::pipeline::{evaluate_standard, exit_codes, output_report, parse_sbom_with_context};
use anyhow::{bail, Result};
use std::path::Path;

/// Run the compliance command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_compliance(sbom_path: &Path, config: &AppConfig, quiet: bool) -> Result<i32> {
    let errors = config.validate();
    if !errors.is_empty() {
        let listed: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("Invalid configuration:\n  {}", listed.join("\n  "));
    }
    let standard = config.standard()?;

    let sbom = parse_sbom_with_context(sbom_path, quiet)?;
    let report = evaluate_standard(&sbom, standard)?;
    output_report(&report, sbom_path, &config.output, quiet)?;

    if let Some(threshold) = config.compliance.min_score {
        if !report.passes(threshold) {
            tracing::error!(
                "{} score {:.1} is below minimum threshold {:.1}",
                report.descriptor.short_name,
                report.summary.total_score,
                threshold
            );
            return Ok(exit_codes::BELOW_MIN_SCORE);
        }
    }

    Ok(exit_codes::SUCCESS)
}
