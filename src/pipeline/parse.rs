//! Document parsing stage.

use super::PipelineError;
use crate::model::NormalizedSbom;
use std::path::Path;

/// Parse an SBOM, attaching the path to any failure.
pub fn parse_sbom_with_context(path: &Path, quiet: bool) -> Result<NormalizedSbom, PipelineError> {
    if !quiet {
        tracing::info!("Parsing SBOM: {}", path.display());
    }

    let sbom = crate::parsers::parse_sbom(path).map_err(|e| PipelineError::ParseFailed {
        path: path.display().to_string(),
        source: e.into(),
    })?;

    tracing::debug!(
        content_hash = sbom.content_hash,
        format = %sbom.document.format,
        "Parsed {} components, {} relationships",
        sbom.component_count(),
        sbom.edges.len()
    );
    sbom.log_collision_summary();

    Ok(sbom)
}
