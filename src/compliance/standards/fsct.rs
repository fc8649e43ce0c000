//! Framing Software Component Transparency, third edition.
//!
//! Every record carries a maturity level. The numeric score is 10 when the
//! attribute reaches the Minimum level and 0 otherwise.

use super::common::{self, Finding, FAIL, PASS};
use crate::compliance::check::Check;
use crate::compliance::context::RunContext;
use crate::compliance::record::{CheckKey, Maturity, Record, DOC_ID, PRIMARY_COMPONENT_ID};
use crate::compliance::report::StandardDescriptor;
use crate::compliance::section::SectionMeta;
use crate::compliance::standard::Standard;
use crate::model::{Component, NormalizedSbom};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FsctKey {
    SbomAuthor,
    SbomTimestamp,
    SbomType,
    SbomPrimaryComponent,
    SbomPrimaryRelationships,
    CompName,
    CompVersion,
    CompSupplier,
    CompUniqueId,
    CompHash,
    CompLicense,
    CompCopyright,
    CompRelationships,
}

const META: &str = "SBOM Meta Information";
const PRIMARY: &str = "Primary Component";
const COMPONENT: &str = "Component Attributes";

impl FsctKey {
    #[must_use]
    pub const fn meta(self) -> SectionMeta {
        match self {
            Self::SbomAuthor => SectionMeta::new(META, "2.2.1.1", true, "SBOM Author"),
            Self::SbomTimestamp => SectionMeta::new(META, "2.2.1.2", true, "Timestamp"),
            Self::SbomType => SectionMeta::new(META, "2.2.1.3", false, "SBOM Type"),
            Self::SbomPrimaryComponent => {
                SectionMeta::new(PRIMARY, "2.2.1.4", true, "Primary Component")
            }
            Self::SbomPrimaryRelationships => {
                SectionMeta::new(PRIMARY, "2.2.1.5", true, "Relationships")
            }
            Self::CompName => SectionMeta::new(COMPONENT, "2.2.2.1", true, "Component Name"),
            Self::CompVersion => SectionMeta::new(COMPONENT, "2.2.2.2", true, "Version"),
            Self::CompSupplier => SectionMeta::new(COMPONENT, "2.2.2.3", true, "Supplier Name"),
            Self::CompUniqueId => SectionMeta::new(COMPONENT, "2.2.2.4", true, "Unique Identifier"),
            Self::CompHash => SectionMeta::new(COMPONENT, "2.2.2.5", true, "Cryptographic Hash"),
            Self::CompLicense => SectionMeta::new(COMPONENT, "2.2.2.6", true, "License"),
            Self::CompCopyright => SectionMeta::new(COMPONENT, "2.2.2.7", false, "Copyright Notice"),
            Self::CompRelationships => {
                SectionMeta::new(COMPONENT, "2.2.2.8", true, "Dependency Relationships")
            }
        }
    }
}

impl CheckKey for FsctKey {
    fn all() -> &'static [Self] {
        &[
            Self::SbomAuthor,
            Self::SbomTimestamp,
            Self::SbomType,
            Self::SbomPrimaryComponent,
            Self::SbomPrimaryRelationships,
            Self::CompName,
            Self::CompVersion,
            Self::CompSupplier,
            Self::CompUniqueId,
            Self::CompHash,
            Self::CompLicense,
            Self::CompCopyright,
            Self::CompRelationships,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::SbomAuthor => "SbomAuthor",
            Self::SbomTimestamp => "SbomTimestamp",
            Self::SbomType => "SbomType",
            Self::SbomPrimaryComponent => "SbomPrimaryComponent",
            Self::SbomPrimaryRelationships => "SbomPrimaryRelationships",
            Self::CompName => "CompName",
            Self::CompVersion => "CompVersion",
            Self::CompSupplier => "CompSupplier",
            Self::CompUniqueId => "CompUniqueId",
            Self::CompHash => "CompHash",
            Self::CompLicense => "CompLicense",
            Self::CompCopyright => "CompCopyright",
            Self::CompRelationships => "CompRelationships",
        }
    }
}

/// Framing Software Component Transparency v3 (2024).
#[derive(Debug, Clone, Copy, Default)]
pub struct Fsct;

impl Standard for Fsct {
    type Key = FsctKey;

    fn descriptor(&self) -> StandardDescriptor {
        StandardDescriptor {
            report_name: "Framing Software Component Transparency v3 Compliance Report",
            subtitle: "Baseline Attributes and Maturity",
            revision: "Third Edition (2024)",
            short_name: "FSCT v3",
        }
    }

    fn checks(&self) -> Vec<Check<FsctKey>> {
        vec![
            Check::Document(document_checks),
            Check::Document(primary_component_checks),
            Check::Component(comp_name),
            Check::Component(comp_version),
            Check::Component(comp_supplier),
            Check::Component(comp_unique_id),
            Check::Component(comp_hash),
            Check::Component(comp_license),
            Check::Component(comp_copyright),
            Check::Component(comp_relationships),
        ]
    }

    fn metadata(&self) -> HashMap<FsctKey, SectionMeta> {
        FsctKey::all().iter().map(|k| (*k, k.meta())).collect()
    }
}

/// A finding graded on the maturity scale.
struct Graded {
    value: String,
    maturity: Maturity,
}

impl Graded {
    fn new(value: impl Into<String>, maturity: Maturity) -> Self {
        Self {
            value: value.into(),
            maturity,
        }
    }

    /// Minimum when the finding passed, None otherwise.
    fn baseline(finding: Finding) -> Self {
        let maturity = if finding.passed {
            Maturity::Minimum
        } else {
            Maturity::None
        };
        Self::new(finding.value, maturity)
    }

    /// Raise a passing Minimum to Recommended when `recommended` holds.
    fn upgrade_if(mut self, recommended: bool) -> Self {
        if recommended && self.maturity == Maturity::Minimum {
            self.maturity = Maturity::Recommended;
        }
        self
    }

    fn record(self, key: FsctKey, id: &str) -> Record<FsctKey> {
        let score = if self.maturity.meets_baseline() {
            PASS
        } else {
            FAIL
        };
        Record::new(key, id, self.value, score, key.meta().required).with_maturity(self.maturity)
    }
}

fn document_checks(sbom: &NormalizedSbom, _: &RunContext) -> Vec<Record<FsctKey>> {
    let author = common::authors(sbom);
    let author_contact = sbom.document.authors().any(|c| c.has_contact());
    let sbom_type = match common::lifecycles(sbom) {
        f if f.passed => Graded::new(f.value, Maturity::Recommended),
        f => Graded::new(f.value, Maturity::None),
    };

    vec![
        Graded::baseline(author)
            .upgrade_if(author_contact)
            .record(FsctKey::SbomAuthor, DOC_ID),
        Graded::baseline(common::timestamp(sbom))
            .record(FsctKey::SbomTimestamp, DOC_ID),
        sbom_type.record(FsctKey::SbomType, DOC_ID),
    ]
}

/// The described product and its direct dependencies, recorded under their
/// own element.
fn primary_component_checks(sbom: &NormalizedSbom, ctx: &RunContext) -> Vec<Record<FsctKey>> {
    let Some(primary) = sbom.primary_component() else {
        return vec![
            Graded::new("missing", Maturity::None)
                .record(FsctKey::SbomPrimaryComponent, PRIMARY_COMPONENT_ID),
            Graded::new("no primary component", Maturity::None)
                .record(FsctKey::SbomPrimaryRelationships, PRIMARY_COMPONENT_ID),
        ];
    };

    let relationships = match ctx.primary_dependency_count() {
        0 => Graded::new("no direct dependencies", Maturity::None),
        n => Graded::new(
            format!(
                "{n} direct dependencies, completeness {}",
                sbom.document.completeness
            ),
            Maturity::Minimum,
        )
        .upgrade_if(sbom.document.completeness.is_declared()),
    };

    vec![
        Graded::new(primary.display_name(), Maturity::Minimum)
            .record(FsctKey::SbomPrimaryComponent, PRIMARY_COMPONENT_ID),
        relationships.record(FsctKey::SbomPrimaryRelationships, PRIMARY_COMPONENT_ID),
    ]
}

fn comp_name(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<FsctKey> {
    Graded::baseline(common::name(c)).record(FsctKey::CompName, ctx.element_id(c))
}

fn comp_version(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<FsctKey> {
    Graded::baseline(common::version(c)).record(FsctKey::CompVersion, ctx.element_id(c))
}

fn comp_supplier(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<FsctKey> {
    let contact = c.supplier.as_ref().is_some_and(|s| s.has_contact());
    Graded::baseline(common::supplier(c))
        .upgrade_if(contact)
        .record(FsctKey::CompSupplier, ctx.element_id(c))
}

/// Recommended when more than one kind of identifier is given.
fn comp_unique_id(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<FsctKey> {
    let ids = &c.identifiers;
    let kinds = [ids.has_valid_purl(), !ids.cpe.is_empty(), ids.swid.is_some()]
        .iter()
        .filter(|k| **k)
        .count();
    Graded::baseline(common::unique_ids(c))
        .upgrade_if(kinds > 1)
        .record(FsctKey::CompUniqueId, ctx.element_id(c))
}

fn comp_hash(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<FsctKey> {
    let any = common::hash_matching(c, |_| true);
    let strong = common::hash_matching(c, |a| a.is_strong());
    let graded = if strong.passed {
        Graded::new(strong.value, Maturity::Recommended)
    } else {
        Graded::baseline(any)
    };
    graded.record(FsctKey::CompHash, ctx.element_id(c))
}

fn comp_license(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<FsctKey> {
    let valid = common::licenses_valid(c.licenses.asserted());
    let graded = if valid.passed {
        Graded::new(valid.value, Maturity::Recommended)
    } else {
        Graded::baseline(Finding::any(
            c.licenses.asserted().iter().map(|l| l.expression.as_str()),
        ))
    };
    graded.record(FsctKey::CompLicense, ctx.element_id(c))
}

fn comp_copyright(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<FsctKey> {
    let copyright = c
        .copyright
        .as_deref()
        .filter(|v| !v.trim().eq_ignore_ascii_case("NOASSERTION"));
    Graded::baseline(Finding::present(copyright)).record(FsctKey::CompCopyright, ctx.element_id(c))
}

fn comp_relationships(sbom: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<FsctKey> {
    let has_deps = !ctx.dependencies_of(&c.canonical_id).is_empty();
    Graded::baseline(common::dependencies(c, ctx))
        .upgrade_if(has_deps && sbom.document.completeness.is_declared())
        .record(FsctKey::CompRelationships, ctx.element_id(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::section::validate_metadata;
    use crate::compliance::standard::evaluate;
    use crate::model::{
        CanonicalId, CompletenessDeclaration, Creator, CreatorType, DependencyEdge,
        DependencyType, Hash, HashAlgorithm, LicenseExpression,
    };

    fn product() -> NormalizedSbom {
        let mut sbom = NormalizedSbom::default();
        sbom.document
            .creators
            .push(Creator::new(CreatorType::Person, "Jane").with_email("jane@acme.example"));
        sbom.add_component(Component::new("fw".into(), "fw".into()).with_version("1.0".into()));
        let mut lib = Component::new("zlib".into(), "zlib".into()).with_version("1.3".into());
        lib.hashes.push(Hash {
            algorithm: HashAlgorithm::Sha1,
            value: "00".into(),
        });
        lib.licenses.add_declared(LicenseExpression::new("Zlib".into()));
        sbom.add_component(lib);
        sbom.set_primary_component(CanonicalId::from_format_id("fw"));
        sbom.add_edge(DependencyEdge::new(
            CanonicalId::from_format_id("fw"),
            CanonicalId::from_format_id("zlib"),
            DependencyType::DependsOn,
        ));
        sbom
    }

    fn section<'a>(
        report: &'a crate::compliance::ComplianceReport,
        element: &str,
        field: &str,
    ) -> &'a crate::compliance::Section {
        report
            .sections
            .iter()
            .find(|s| s.element_id == element && s.section_data_field == field)
            .unwrap()
    }

    #[test]
    fn test_metadata_covers_every_key() {
        let meta = Fsct.metadata();
        assert_eq!(meta.len(), FsctKey::all().len());
        assert!(validate_metadata(&meta, "fsct").is_ok());
    }

    #[test]
    fn test_every_section_has_maturity() {
        let report = evaluate(&Fsct, &product()).unwrap();
        assert!(!report.sections.is_empty());
        assert!(report.sections.iter().all(|s| s.maturity.is_some()));
    }

    #[test]
    fn test_author_with_contact_is_recommended() {
        let report = evaluate(&Fsct, &product()).unwrap();
        let author = section(&report, "SBOM Level", "SBOM Author");
        assert_eq!(author.maturity, Some(Maturity::Recommended));
        assert_eq!(author.score, 10.0);
    }

    #[test]
    fn test_primary_component_bucket() {
        let report = evaluate(&Fsct, &product()).unwrap();
        let primary = section(&report, PRIMARY_COMPONENT_ID, "Primary Component");
        assert_eq!(primary.element_result, "fw@1.0");
        let rel = section(&report, PRIMARY_COMPONENT_ID, "Relationships");
        assert_eq!(rel.maturity, Some(Maturity::Minimum));

        let mut complete = product();
        complete.document.completeness = CompletenessDeclaration::Complete;
        let report = evaluate(&Fsct, &complete).unwrap();
        let rel = section(&report, PRIMARY_COMPONENT_ID, "Relationships");
        assert_eq!(rel.maturity, Some(Maturity::Recommended));
    }

    #[test]
    fn test_missing_primary_component_scores_zero() {
        let mut sbom = product();
        sbom.primary_component_id = None;
        let report = evaluate(&Fsct, &sbom).unwrap();
        let primary = section(&report, PRIMARY_COMPONENT_ID, "Primary Component");
        assert_eq!(primary.maturity, Some(Maturity::None));
        assert_eq!(primary.score, 0.0);
    }

    #[test]
    fn test_weak_hash_is_minimum_only() {
        let report = evaluate(&Fsct, &product()).unwrap();
        let hash = section(&report, "zlib@1.3", "Cryptographic Hash");
        assert_eq!(hash.maturity, Some(Maturity::Minimum));
        assert_eq!(hash.score, 10.0);

        let none = section(&report, "fw@1.0", "Cryptographic Hash");
        assert_eq!(none.maturity, Some(Maturity::None));
        assert_eq!(none.score, 0.0);
    }

    #[test]
    fn test_valid_license_is_recommended() {
        let report = evaluate(&Fsct, &product()).unwrap();
        let license = section(&report, "zlib@1.3", "License");
        assert_eq!(license.maturity, Some(Maturity::Recommended));
    }
}
