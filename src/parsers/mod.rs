//! SBOM format parsers.
//!
//! Converts CycloneDX (JSON) and SPDX (JSON, tag-value) documents into the
//! normalized model. Each parser reports a confidence for a piece of content
//! and the [`FormatDetector`] picks the most confident one.

mod cyclonedx;
mod detection;
mod spdx;
mod traits;

pub use cyclonedx::CycloneDxParser;
pub use detection::{DetectionResult, FormatDetector, ParserKind, MIN_CONFIDENCE_THRESHOLD};
pub use spdx::SpdxParser;
pub use traits::{FormatConfidence, FormatDetection, ParseError, SbomParser};

use crate::model::NormalizedSbom;
use std::path::Path;

/// Maximum SBOM file size (512 MB).
const MAX_SBOM_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Read a file and parse it with the detected format.
pub fn parse_sbom(path: &Path) -> Result<NormalizedSbom, ParseError> {
    let metadata = std::fs::metadata(path).map_err(|e| ParseError::IoError(e.to_string()))?;
    if metadata.len() > MAX_SBOM_FILE_SIZE {
        return Err(ParseError::IoError(format!(
            "SBOM file is {} MB, exceeding the {} MB limit",
            metadata.len() / (1024 * 1024),
            MAX_SBOM_FILE_SIZE / (1024 * 1024),
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| ParseError::IoError(e.to_string()))?;
    parse_sbom_str(&content)
}

/// Parse SBOM from string content
pub fn parse_sbom_str(content: &str) -> Result<NormalizedSbom, ParseError> {
    FormatDetector::new().parse_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_cyclonedx_json() {
        let content = r#"{"bomFormat": "CycloneDX", "specVersion": "1.5"}"#;
        let detected = FormatDetector::new().detect_from_content(content);
        assert_eq!(detected.parser, Some(ParserKind::CycloneDx));
        assert_eq!(detected.version.as_deref(), Some("1.5"));
        assert!(detected.can_parse());
    }

    #[test]
    fn test_detect_spdx_tag_value() {
        let content = "SPDXVersion: SPDX-2.3\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT";
        let detected = FormatDetector::new().detect_from_content(content);
        assert_eq!(detected.parser, Some(ParserKind::Spdx));
        assert_eq!(detected.variant.as_deref(), Some("tag-value"));
        assert_eq!(detected.version.as_deref(), Some("2.3"));
    }

    #[test]
    fn test_unknown_content_is_rejected() {
        let content = r#"{"some": "random", "json": "content"}"#;
        assert!(!FormatDetector::new().detect_from_content(content).can_parse());
        assert!(matches!(
            parse_sbom_str(content),
            Err(ParseError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_cyclonedx_outranks_spdx_for_cyclonedx_content() {
        let content = r#"{"bomFormat": "CycloneDX", "specVersion": "1.6", "components": []}"#;
        let cdx = CycloneDxParser::new().confidence(content);
        let spdx = SpdxParser::new().confidence(content);
        assert!(cdx.value() > spdx.value());
    }
}
