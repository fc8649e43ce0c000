//! License data structures and SPDX expression handling.
//!
//! Uses the `spdx` crate for SPDX expression parsing. Lax mode accepts common
//! non-standard spellings ("Apache2", "/" for OR), which is what SBOM
//! generators emit in practice.

use serde::{Deserialize, Serialize};
use std::fmt;

/// License expression following SPDX license expression syntax
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicenseExpression {
    /// The raw license expression string
    pub expression: String,
    /// Whether this is a valid SPDX expression
    pub is_valid_spdx: bool,
}

impl LicenseExpression {
    #[must_use]
    pub fn new(expression: String) -> Self {
        let is_valid_spdx = Self::validate_spdx(&expression);
        Self {
            expression,
            is_valid_spdx,
        }
    }

    fn validate_spdx(expr: &str) -> bool {
        if expr.is_empty() || Self::is_no_assertion_str(expr) {
            return false;
        }
        spdx::Expression::parse_mode(expr, spdx::ParseMode::LAX).is_ok()
    }

    fn is_no_assertion_str(expr: &str) -> bool {
        let trimmed = expr.trim();
        trimmed.eq_ignore_ascii_case("NOASSERTION") || trimmed.eq_ignore_ascii_case("NONE")
    }

    /// `NOASSERTION` / `NONE` placeholders
    #[must_use]
    pub fn is_no_assertion(&self) -> bool {
        Self::is_no_assertion_str(&self.expression)
    }

    /// Whether every license in the expression is on the SPDX list, or is a
    /// `LicenseRef-` custom reference.
    #[must_use]
    pub fn is_spdx_or_custom(&self) -> bool {
        self.is_valid_spdx || self.expression.trim_start().starts_with("LicenseRef-")
    }
}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// License information for a component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Declared licenses from the component metadata
    pub declared: Vec<LicenseExpression>,
    /// Concluded license after analysis
    pub concluded: Option<LicenseExpression>,
}

impl LicenseInfo {
    pub fn add_declared(&mut self, license: LicenseExpression) {
        self.declared.push(license);
    }

    /// Declared and concluded expressions, declared first.
    #[must_use]
    pub fn all_licenses(&self) -> Vec<&LicenseExpression> {
        let mut licenses: Vec<&LicenseExpression> = self.declared.iter().collect();
        if let Some(concluded) = &self.concluded {
            licenses.push(concluded);
        }
        licenses
    }

    /// Licenses that state something, i.e. not `NOASSERTION`/`NONE`.
    #[must_use]
    pub fn asserted(&self) -> Vec<&LicenseExpression> {
        self.all_licenses()
            .into_iter()
            .filter(|l| !l.is_no_assertion() && !l.expression.trim().is_empty())
            .collect()
    }
}
