//! Findings shared by several standards.
//!
//! Each helper inspects one aspect of the document or a component and
//! returns a [`Finding`]: the text shown in the report and whether the
//! requirement is met. Standards turn findings into records with their own
//! keys and required flags.

use crate::compliance::context::RunContext;
use crate::compliance::record::{CheckKey, Record, DOC_ID};
use crate::model::{
    Component, ExternalRefType, Hash, HashAlgorithm, LicenseExpression, NormalizedSbom,
    SbomFormat,
};
use regex::Regex;
use std::sync::LazyLock;

pub const PASS: f64 = 10.0;
pub const FAIL: f64 = 0.0;

const MISSING: &str = "missing";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"));

/// What a check saw and whether it satisfies the requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub value: String,
    pub passed: bool,
}

impl Finding {
    pub fn pass(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            passed: true,
        }
    }

    pub fn fail(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            passed: false,
        }
    }

    #[must_use]
    pub fn missing() -> Self {
        Self::fail(MISSING)
    }

    /// Pass with the value when present and non-blank.
    #[must_use]
    pub fn present(value: Option<&str>) -> Self {
        match non_blank(value) {
            Some(v) => Self::pass(v),
            None => Self::missing(),
        }
    }

    /// Pass with the joined values when there is at least one.
    pub fn any<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = join(values);
        if joined.is_empty() {
            Self::missing()
        } else {
            Self::pass(joined)
        }
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        if self.passed {
            PASS
        } else {
            FAIL
        }
    }

    pub fn record<K: CheckKey>(self, key: K, id: &str, required: bool) -> Record<K> {
        let score = self.score();
        Record::new(key, id, self.value, score, required)
    }

    pub fn doc<K: CheckKey>(self, key: K, required: bool) -> Record<K> {
        self.record(key, DOC_ID, required)
    }
}

#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn join<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .filter(|v| !v.as_ref().trim().is_empty())
        .map(|v| v.as_ref().trim().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

#[must_use]
pub fn is_url(value: &str) -> bool {
    let v = value.trim();
    v.starts_with("https://") || v.starts_with("http://")
}

/// Compare dotted versions, treating missing segments as zero. Accepts an
/// `SPDX-` prefix.
#[must_use]
pub fn version_at_least(version: &str, minimum: &str) -> bool {
    match (lenient_version(version), lenient_version(minimum)) {
        (Some(v), Some(min)) => v >= min,
        _ => false,
    }
}

fn lenient_version(raw: &str) -> Option<semver::Version> {
    let trimmed = raw.trim().trim_start_matches("SPDX-");
    let mut parts: Vec<&str> = trimmed.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }
    semver::Version::parse(&parts.join(".")).ok()
}

// ---- document-level findings ----

pub fn spec(sbom: &NormalizedSbom) -> Finding {
    Finding::pass(match sbom.document.format {
        SbomFormat::CycloneDx => "cyclonedx",
        SbomFormat::Spdx => "spdx",
    })
}

pub fn spec_version(sbom: &NormalizedSbom, cdx_min: &str, spdx_min: &str) -> Finding {
    let version = sbom.document.spec_version.trim();
    if version.is_empty() {
        return Finding::missing();
    }
    let minimum = match sbom.document.format {
        SbomFormat::CycloneDx => cdx_min,
        SbomFormat::Spdx => spdx_min,
    };
    if version_at_least(version, minimum) {
        Finding::pass(version)
    } else {
        Finding::fail(version)
    }
}

/// Serialization the document arrived in.
pub fn machine_format(sbom: &NormalizedSbom) -> Finding {
    let version = sbom.document.spec_version.trim();
    if version.is_empty() {
        return Finding::fail(format!("{}, {}", sbom.document.format, sbom.document.file_format));
    }
    Finding::pass(format!(
        "{} {}, {}",
        sbom.document.format, version, sbom.document.file_format
    ))
}

pub fn lifecycles(sbom: &NormalizedSbom) -> Finding {
    Finding::any(&sbom.document.lifecycles)
}

/// The SBOM was produced during the build.
pub fn build_phase(sbom: &NormalizedSbom) -> Finding {
    let phases = &sbom.document.lifecycles;
    if phases.iter().any(|p| p.eq_ignore_ascii_case("build")) {
        Finding::pass("build")
    } else if phases.is_empty() {
        Finding::missing()
    } else {
        Finding::fail(join(phases))
    }
}

/// The primary component exists and its direct dependencies are listed.
pub fn depth(sbom: &NormalizedSbom, ctx: &RunContext) -> Finding {
    let Some(primary) = sbom.primary_component() else {
        return Finding::fail("no primary component");
    };
    match ctx.primary_dependency_count() {
        0 => Finding::fail(format!("{} declares no dependencies", primary.display_name())),
        n => Finding::pass(format!(
            "{} declares {n} direct dependencies",
            primary.display_name()
        )),
    }
}

/// Names of persons and organizations that authored the document.
pub fn authors(sbom: &NormalizedSbom) -> Finding {
    Finding::any(sbom.document.authors().map(|c| c.name.as_str()))
}

/// Email or URL of whoever created the document.
pub fn creator_contact(sbom: &NormalizedSbom) -> Finding {
    let doc = &sbom.document;
    let from_authors = doc.authors().find_map(|c| {
        non_blank(c.email.as_deref()).or_else(|| non_blank(c.url.as_deref()))
    });
    let contact = from_authors
        .or_else(|| doc.manufacturer.as_ref().and_then(|m| m.first_contact()))
        .or_else(|| doc.supplier.as_ref().and_then(|s| s.first_contact()));
    match contact {
        Some(c) if is_email(c) || is_url(c) => Finding::pass(c),
        Some(c) => Finding::fail(c),
        None => Finding::missing(),
    }
}

pub fn timestamp(sbom: &NormalizedSbom) -> Finding {
    match sbom.document.created {
        Some(created) => Finding::pass(created.to_rfc3339()),
        None => Finding::missing(),
    }
}

/// Serial number (CycloneDX) or document namespace (SPDX).
pub fn sbom_uri(sbom: &NormalizedSbom) -> Finding {
    Finding::present(sbom.document.serial_number.as_deref())
}

// ---- component-level findings ----

pub fn name(comp: &Component) -> Finding {
    Finding::present(Some(comp.name.as_str()))
}

pub fn version(comp: &Component) -> Finding {
    Finding::present(comp.version.as_deref())
}

pub fn supplier(comp: &Component) -> Finding {
    Finding::present(comp.supplier.as_ref().and_then(|s| s.display_name()))
}

/// Email or URL of the component's creator.
pub fn component_contact(comp: &Component) -> Finding {
    let contact = comp
        .supplier
        .as_ref()
        .and_then(|s| s.first_contact())
        .or_else(|| {
            non_blank(comp.author.as_deref()).filter(|a| is_email(a) || is_url(a))
        });
    match contact {
        Some(c) => Finding::pass(c),
        None => Finding::missing(),
    }
}

/// Direct dependencies, or confirmation that the component is a leaf in the
/// dependency graph.
pub fn dependencies(comp: &Component, ctx: &RunContext) -> Finding {
    let deps = ctx.dependencies_of(&comp.canonical_id);
    if !deps.is_empty() {
        Finding::pass(join(deps))
    } else if ctx.is_depended_upon(&comp.canonical_id) {
        Finding::pass("no dependencies")
    } else {
        Finding::fail("no relationships")
    }
}

pub fn unique_ids(comp: &Component) -> Finding {
    Finding::any(comp.identifiers.unique_ids())
}

/// Licenses, passing only when every asserted expression is SPDX or a
/// `LicenseRef-`.
pub fn licenses_valid<'a>(licenses: impl IntoIterator<Item = &'a LicenseExpression>) -> Finding {
    let licenses: Vec<&LicenseExpression> = licenses
        .into_iter()
        .filter(|l| !l.is_no_assertion() && !l.expression.trim().is_empty())
        .collect();
    if licenses.is_empty() {
        return Finding::missing();
    }
    let value = join(licenses.iter().map(|l| l.expression.as_str()));
    if licenses.iter().all(|l| l.is_spdx_or_custom()) {
        Finding::pass(value)
    } else {
        Finding::fail(value)
    }
}

/// Component hashes plus hashes attached to its distribution references.
pub fn artifact_hashes(comp: &Component) -> impl Iterator<Item = &Hash> {
    comp.hashes.iter().chain(
        comp.refs_of(&ExternalRefType::BinaryDistribution)
            .flat_map(|r| r.hashes.iter()),
    )
}

/// Pass when any artifact hash satisfies `accept`; the value lists what is
/// there.
pub fn hash_matching(comp: &Component, accept: impl Fn(&HashAlgorithm) -> bool) -> Finding {
    let hashes: Vec<&Hash> = artifact_hashes(comp).collect();
    if hashes.is_empty() {
        return Finding::missing();
    }
    match hashes.iter().find(|h| accept(&h.algorithm)) {
        Some(h) => Finding::pass(format!("{}: {}", h.algorithm, h.value)),
        None => Finding::fail(join(hashes.iter().map(|h| h.algorithm.to_string()))),
    }
}

pub fn source_code_uri(comp: &Component) -> Finding {
    Finding::any(comp.refs_of(&ExternalRefType::Vcs).map(|r| r.url.as_str()))
}

/// Where the deployable artifact can be fetched.
pub fn distribution_uri(comp: &Component) -> Finding {
    let refs = join(
        comp.refs_of(&ExternalRefType::BinaryDistribution)
            .map(|r| r.url.as_str()),
    );
    if !refs.is_empty() {
        return Finding::pass(refs);
    }
    match non_blank(comp.download_location.as_deref()) {
        Some(loc) if is_url(loc) => Finding::pass(loc),
        _ => Finding::missing(),
    }
}

pub fn source_hash(comp: &Component) -> Finding {
    Finding::any(
        comp.refs_of(&ExternalRefType::SourceDistribution)
            .chain(comp.refs_of(&ExternalRefType::Vcs))
            .flat_map(|r| r.hashes.iter())
            .map(|h| format!("{}: {}", h.algorithm, h.value)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Creator, CreatorType, ExternalReference, Organization};

    #[test]
    fn test_version_at_least() {
        assert!(version_at_least("1.5", "1.4"));
        assert!(version_at_least("1.4", "1.4"));
        assert!(!version_at_least("1.3", "1.4"));
        assert!(version_at_least("2.3", "2.2.1"));
        assert!(!version_at_least("2.2", "2.2.1"));
        assert!(version_at_least("SPDX-2.3", "2.3"));
        assert!(!version_at_least("garbage", "1.0"));
    }

    #[test]
    fn test_email_and_url() {
        assert!(is_email("ops@acme.example"));
        assert!(!is_email("acme"));
        assert!(is_url("https://acme.example"));
        assert!(!is_url("acme.example"));
    }

    #[test]
    fn test_finding_present() {
        assert!(Finding::present(Some("x")).passed);
        assert_eq!(Finding::present(Some("  ")), Finding::missing());
        assert_eq!(Finding::present(None).score(), FAIL);
    }

    #[test]
    fn test_creator_contact_prefers_author_email() {
        let mut sbom = NormalizedSbom::default();
        sbom.document
            .creators
            .push(Creator::new(CreatorType::Tool, "syft"));
        assert_eq!(creator_contact(&sbom), Finding::missing());

        sbom.document
            .creators
            .push(Creator::new(CreatorType::Person, "Jane").with_email("jane@acme.example"));
        assert_eq!(creator_contact(&sbom), Finding::pass("jane@acme.example"));
    }

    #[test]
    fn test_creator_contact_falls_back_to_manufacturer() {
        let mut sbom = NormalizedSbom::default();
        let mut acme = Organization::new("Acme".into());
        acme.urls.push("https://acme.example".into());
        sbom.document.manufacturer = Some(acme);
        assert!(creator_contact(&sbom).passed);
    }

    #[test]
    fn test_licenses_valid() {
        let mit = LicenseExpression::new("MIT".into());
        let custom = LicenseExpression::new("LicenseRef-acme".into());
        let bogus = LicenseExpression::new("Some EULA text".into());
        let none = LicenseExpression::new("NOASSERTION".into());

        assert!(licenses_valid([&mit, &custom]).passed);
        assert!(!licenses_valid([&mit, &bogus]).passed);
        assert_eq!(licenses_valid([&none]), Finding::missing());
    }

    #[test]
    fn test_hash_matching_reads_distribution_hashes() {
        let mut comp = Component::new("a".into(), "a".into());
        assert_eq!(
            hash_matching(&comp, |a| *a == HashAlgorithm::Sha512),
            Finding::missing()
        );

        comp.hashes.push(Hash {
            algorithm: HashAlgorithm::Sha256,
            value: "aa".into(),
        });
        let finding = hash_matching(&comp, |a| *a == HashAlgorithm::Sha512);
        assert!(!finding.passed);
        assert_eq!(finding.value, "SHA-256");

        let mut dist = ExternalReference::new(
            ExternalRefType::BinaryDistribution,
            "https://dl.example/a.tgz".into(),
        );
        dist.hashes.push(Hash {
            algorithm: HashAlgorithm::Sha512,
            value: "bb".into(),
        });
        comp.external_refs.push(dist);
        assert_eq!(
            hash_matching(&comp, |a| *a == HashAlgorithm::Sha512),
            Finding::pass("SHA-512: bb")
        );
    }

    #[test]
    fn test_distribution_uri_falls_back_to_download_location() {
        let mut comp = Component::new("a".into(), "a".into());
        comp.download_location = Some("NOASSERTION".into());
        assert!(!distribution_uri(&comp).passed);
        comp.download_location = Some("https://dl.example/a.tgz".into());
        assert!(distribution_uri(&comp).passed);
    }
}
