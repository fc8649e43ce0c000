//! The unit of evaluation: one verdict about one attribute of one element.

use super::section::DOC_LABEL;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Element id used for document-level records.
pub const DOC_ID: &str = "doc";

/// Element id of the product a document describes, for standards that score
/// it separately from the ordinary component rows.
pub const PRIMARY_COMPONENT_ID: &str = "Primary Component";

/// Ids that derived component element ids must never take.
pub const RESERVED_IDS: &[&str] = &[DOC_ID, PRIMARY_COMPONENT_ID, DOC_LABEL];

/// A standard's enumeration of the attributes it checks.
///
/// Each standard defines its own key type; keys of different standards are
/// never mixed in one store.
pub trait CheckKey: Copy + Eq + Hash + Ord + Debug + Send + Sync + 'static {
    /// Every key the standard can produce.
    fn all() -> &'static [Self];

    /// Stable identifier used in diagnostics.
    fn name(self) -> &'static str;
}

/// Ordinal maturity level layered over the numeric score (FSCT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Maturity {
    None,
    Minimum,
    Recommended,
    Aspirational,
}

impl Maturity {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Minimum => "Minimum",
            Self::Recommended => "Recommended",
            Self::Aspirational => "Aspirational",
        }
    }

    /// Minimum or better.
    #[must_use]
    pub const fn meets_baseline(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for Maturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One evaluation outcome. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<K> {
    check_key: K,
    check_value: String,
    id: String,
    score: f64,
    required: bool,
    maturity: Option<Maturity>,
}

impl<K: CheckKey> Record<K> {
    #[must_use]
    pub fn new(
        check_key: K,
        id: impl Into<String>,
        check_value: impl Into<String>,
        score: f64,
        required: bool,
    ) -> Self {
        Self {
            check_key,
            check_value: check_value.into(),
            id: id.into(),
            score,
            required,
            maturity: None,
        }
    }

    /// Document-level record
    #[must_use]
    pub fn doc(check_key: K, check_value: impl Into<String>, score: f64, required: bool) -> Self {
        Self::new(check_key, DOC_ID, check_value, score, required)
    }

    #[must_use]
    pub const fn with_maturity(mut self, maturity: Maturity) -> Self {
        self.maturity = Some(maturity);
        self
    }

    #[must_use]
    pub const fn check_key(&self) -> K {
        self.check_key
    }

    #[must_use]
    pub fn check_value(&self) -> &str {
        &self.check_value
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn maturity(&self) -> Option<Maturity> {
        self.maturity
    }
}

#[cfg(test)]
pub(crate) mod test_keys {
    use super::CheckKey;

    /// Small key set for exercising the store and aggregator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum TestKey {
        Alpha,
        Beta,
        Gamma,
    }

    impl CheckKey for TestKey {
        fn all() -> &'static [Self] {
            &[Self::Alpha, Self::Beta, Self::Gamma]
        }

        fn name(self) -> &'static str {
            match self {
                Self::Alpha => "Alpha",
                Self::Beta => "Beta",
                Self::Gamma => "Gamma",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_keys::TestKey;
    use super::*;

    #[test]
    fn test_doc_record_uses_doc_id() {
        let r = Record::doc(TestKey::Alpha, "present", 10.0, true);
        assert_eq!(r.id(), DOC_ID);
        assert_eq!(r.maturity(), None);
    }

    #[test]
    fn test_maturity_ordering() {
        assert!(Maturity::Aspirational > Maturity::Recommended);
        assert!(Maturity::Recommended > Maturity::Minimum);
        assert!(!Maturity::None.meets_baseline());
        assert!(Maturity::Minimum.meets_baseline());
    }
}
