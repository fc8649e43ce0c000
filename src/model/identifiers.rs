//! Identifiers for SBOM components.
//!
//! Components are keyed by their document-local reference (`bom-ref` in
//! CycloneDX, `SPDXID` in SPDX) so that dependency edges resolve exactly as the
//! document wrote them. Package URLs, CPEs and SWID tags are kept alongside as
//! the "other unique identifiers" that several standards ask for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Document-local identifier for a component.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct CanonicalId {
    value: String,
    source: IdSource,
}

/// Where a [`CanonicalId`] was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdSource {
    /// The format's own reference (`bom-ref`, `SPDXID`)
    FormatSpecific,
    /// Synthesized from name and version when the format gave no reference
    NameVersion,
}

impl CanonicalId {
    /// Identifier taken verbatim from the document
    #[must_use]
    pub fn from_format_id(id: &str) -> Self {
        Self {
            value: id.to_string(),
            source: IdSource::FormatSpecific,
        }
    }

    /// Synthesized identifier for components without a reference
    #[must_use]
    pub fn from_name_version(name: &str, version: Option<&str>) -> Self {
        let value = match version {
            Some(v) => format!("{}@{}", name.to_lowercase(), v),
            None => name.to_lowercase(),
        };
        Self {
            value,
            source: IdSource::NameVersion,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn source(&self) -> IdSource {
        self.source
    }
}

impl PartialEq for CanonicalId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Hash for CanonicalId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Component identifiers from various sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentIdentifiers {
    /// Package URL
    pub purl: Option<String>,
    /// Common Platform Enumeration identifiers
    pub cpe: Vec<String>,
    /// Software Identification tag
    pub swid: Option<String>,
    /// Original format-specific identifier
    pub format_id: String,
}

impl ComponentIdentifiers {
    #[must_use]
    pub fn new(format_id: String) -> Self {
        Self {
            format_id,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn canonical_id(&self) -> CanonicalId {
        CanonicalId::from_format_id(&self.format_id)
    }

    /// Whether the PURL parses as a Package URL.
    #[must_use]
    pub fn has_valid_purl(&self) -> bool {
        self.purl
            .as_deref()
            .is_some_and(|p| packageurl::PackageUrl::from_str(p).is_ok())
    }

    /// Whether the component carries any globally meaningful identifier.
    #[must_use]
    pub fn has_unique_id(&self) -> bool {
        self.has_valid_purl() || !self.cpe.is_empty() || self.swid.is_some()
    }

    /// Every globally meaningful identifier, PURL first.
    #[must_use]
    pub fn unique_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        if let Some(purl) = self.purl.as_deref().filter(|_| self.has_valid_purl()) {
            ids.push(purl);
        }
        ids.extend(self.cpe.iter().map(String::as_str));
        if let Some(swid) = &self.swid {
            ids.push(swid);
        }
        ids
    }
}
