//! Format detection across the available parsers.

use super::traits::{FormatConfidence, FormatDetection, ParseError, SbomParser};
use super::{CycloneDxParser, SpdxParser};
use crate::model::NormalizedSbom;

/// Minimum confidence for accepting a detection.
pub const MIN_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Parser type identified during detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    CycloneDx,
    Spdx,
}

impl ParserKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CycloneDx => "CycloneDX",
            Self::Spdx => "SPDX",
        }
    }
}

/// Result of format detection.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// The parser that should handle this content, if any
    pub parser: Option<ParserKind>,
    pub confidence: FormatConfidence,
    pub variant: Option<String>,
    pub version: Option<String>,
    pub warnings: Vec<String>,
}

impl DetectionResult {
    fn unknown(reason: &str) -> Self {
        Self {
            parser: None,
            confidence: FormatConfidence::NONE,
            variant: None,
            version: None,
            warnings: vec![reason.to_string()],
        }
    }

    fn detected(parser: ParserKind, detection: FormatDetection) -> Self {
        Self {
            parser: Some(parser),
            confidence: detection.confidence,
            variant: detection.variant,
            version: detection.version,
            warnings: detection.warnings,
        }
    }

    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.parser.is_some() && self.confidence.value() >= MIN_CONFIDENCE_THRESHOLD
    }
}

/// Picks the parser with the highest confidence for a piece of content.
#[derive(Debug, Default)]
pub struct FormatDetector {
    cyclonedx: CycloneDxParser,
    spdx: SpdxParser,
}

impl FormatDetector {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cyclonedx: CycloneDxParser::new(),
            spdx: SpdxParser::new(),
        }
    }

    #[must_use]
    pub fn detect_from_content(&self, content: &str) -> DetectionResult {
        let cdx_detection = self.cyclonedx.detect(content);
        let spdx_detection = self.spdx.detect(content);
        let cdx_conf = cdx_detection.confidence.value();
        let spdx_conf = spdx_detection.confidence.value();

        tracing::debug!(
            "Format detection: CycloneDX={:.2}, SPDX={:.2}, threshold={:.2}",
            cdx_conf,
            spdx_conf,
            MIN_CONFIDENCE_THRESHOLD
        );

        if cdx_conf >= MIN_CONFIDENCE_THRESHOLD && cdx_conf > spdx_conf {
            DetectionResult::detected(ParserKind::CycloneDx, cdx_detection)
        } else if spdx_conf >= MIN_CONFIDENCE_THRESHOLD {
            DetectionResult::detected(ParserKind::Spdx, spdx_detection)
        } else {
            DetectionResult::unknown("Could not detect SBOM format with sufficient confidence")
        }
    }

    /// Detect, then parse with the selected parser.
    pub fn parse_str(&self, content: &str) -> Result<NormalizedSbom, ParseError> {
        let detection = self.detect_from_content(content);
        for warning in &detection.warnings {
            tracing::warn!("{}", warning);
        }

        match detection.parser {
            Some(ParserKind::CycloneDx) if detection.can_parse() => {
                self.cyclonedx.parse_str(content)
            }
            Some(ParserKind::Spdx) if detection.can_parse() => self.spdx.parse_str(content),
            _ => Err(ParseError::UnknownFormat(
                "Could not detect SBOM format. Expected CycloneDX or SPDX.".to_string(),
            )),
        }
    }
}
