//! Evaluation output handed to the renderers.

use super::score::DocumentScore;
use super::section::Section;
use serde::Serialize;

/// Upper bound of every score.
pub const MAX_SCORE: f64 = 10.0;

/// Static identity of a standard as it appears in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StandardDescriptor {
    pub report_name: &'static str,
    pub subtitle: &'static str,
    pub revision: &'static str,
    /// Used in one-line output
    pub short_name: &'static str,
}

/// Document-level scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_score: f64,
    pub max_score: f64,
    pub required_elements_score: f64,
    pub optional_elements_score: f64,
}

impl From<DocumentScore> for Summary {
    fn from(score: DocumentScore) -> Self {
        Self {
            total_score: score.total,
            max_score: MAX_SCORE,
            required_elements_score: score.required,
            optional_elements_score: score.optional,
        }
    }
}

/// Result of evaluating one document against one standard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    #[serde(skip)]
    pub descriptor: StandardDescriptor,
    pub summary: Summary,
    pub sections: Vec<Section>,
}

impl ComplianceReport {
    /// Whether the total score reaches `min_score`.
    #[must_use]
    pub fn passes(&self, min_score: f64) -> bool {
        self.summary.total_score >= min_score
    }

    /// Sections whose attribute score is below the maximum.
    pub fn failing_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.score < MAX_SCORE)
    }
}
