//! NTIA minimum elements for a Software Bill of Materials.

use super::common::{self, Finding};
use crate::compliance::check::Check;
use crate::compliance::context::RunContext;
use crate::compliance::record::{CheckKey, Record};
use crate::compliance::report::StandardDescriptor;
use crate::compliance::section::SectionMeta;
use crate::compliance::standard::Standard;
use crate::model::{Component, CreatorType, NormalizedSbom};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NtiaKey {
    SbomMachineFormat,
    SbomCreator,
    SbomTimestamp,
    SbomDependency,
    CompSupplier,
    CompName,
    CompVersion,
    CompOtherUniqIds,
    CompDependencies,
    SbomLifecycle,
    CompHash,
    CompLicense,
}

const AUTOMATION: &str = "Automation Support";
const SBOM_REQUIRED: &str = "Required fields sboms";
const COMP_REQUIRED: &str = "Required fields components";
const SBOM_RECOMMENDED: &str = "Recommended fields sboms";
const COMP_RECOMMENDED: &str = "Recommended fields components";

impl NtiaKey {
    #[must_use]
    pub const fn meta(self) -> SectionMeta {
        match self {
            Self::SbomMachineFormat => {
                SectionMeta::new(AUTOMATION, "1.1", true, "Machine-Readable Formats")
            }
            Self::SbomCreator => SectionMeta::new(SBOM_REQUIRED, "2.1", true, "Author"),
            Self::SbomTimestamp => SectionMeta::new(SBOM_REQUIRED, "2.2", true, "Timestamp"),
            Self::SbomDependency => SectionMeta::new(SBOM_REQUIRED, "2.3", true, "Dependencies"),
            Self::CompSupplier => {
                SectionMeta::new(COMP_REQUIRED, "2.4", true, "Package Supplier Name")
            }
            Self::CompName => SectionMeta::new(COMP_REQUIRED, "2.5", true, "Package Name"),
            Self::CompVersion => SectionMeta::new(COMP_REQUIRED, "2.6", true, "Package Version"),
            Self::CompOtherUniqIds => SectionMeta::new(COMP_REQUIRED, "2.7", true, "Other Uniq IDs"),
            Self::CompDependencies => SectionMeta::new(COMP_REQUIRED, "2.8", true, "Relationships"),
            Self::SbomLifecycle => SectionMeta::new(SBOM_RECOMMENDED, "3.1", false, "Lifecycle phase"),
            Self::CompHash => SectionMeta::new(COMP_RECOMMENDED, "3.2", false, "Hash of Component"),
            Self::CompLicense => SectionMeta::new(COMP_RECOMMENDED, "3.3", false, "License"),
        }
    }
}

impl CheckKey for NtiaKey {
    fn all() -> &'static [Self] {
        &[
            Self::SbomMachineFormat,
            Self::SbomCreator,
            Self::SbomTimestamp,
            Self::SbomDependency,
            Self::CompSupplier,
            Self::CompName,
            Self::CompVersion,
            Self::CompOtherUniqIds,
            Self::CompDependencies,
            Self::SbomLifecycle,
            Self::CompHash,
            Self::CompLicense,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::SbomMachineFormat => "SbomMachineFormat",
            Self::SbomCreator => "SbomCreator",
            Self::SbomTimestamp => "SbomTimestamp",
            Self::SbomDependency => "SbomDependency",
            Self::CompSupplier => "CompSupplier",
            Self::CompName => "CompName",
            Self::CompVersion => "CompVersion",
            Self::CompOtherUniqIds => "CompOtherUniqIds",
            Self::CompDependencies => "CompDependencies",
            Self::SbomLifecycle => "SbomLifecycle",
            Self::CompHash => "CompHash",
            Self::CompLicense => "CompLicense",
        }
    }
}

/// NTIA minimum elements (July 2021).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ntia;

impl Standard for Ntia {
    type Key = NtiaKey;

    fn descriptor(&self) -> StandardDescriptor {
        StandardDescriptor {
            report_name: "NTIA-minimum elements Compliance Report",
            subtitle: "Part 2: Software Bill of Materials (SBOM)",
            revision: "July 2021",
            short_name: "NTIA-minimum elements",
        }
    }

    fn checks(&self) -> Vec<Check<NtiaKey>> {
        vec![
            Check::Document(document_checks),
            Check::Component(comp_supplier),
            Check::Component(comp_name),
            Check::Component(comp_version),
            Check::Component(comp_other_uniq_ids),
            Check::Component(comp_dependencies),
            Check::Component(comp_hash),
            Check::Component(comp_license),
        ]
    }

    fn metadata(&self) -> HashMap<NtiaKey, SectionMeta> {
        NtiaKey::all().iter().map(|k| (*k, k.meta())).collect()
    }
}

fn doc(key: NtiaKey, finding: Finding) -> Record<NtiaKey> {
    finding.doc(key, key.meta().required)
}

fn comp(key: NtiaKey, component: &Component, ctx: &RunContext, finding: Finding) -> Record<NtiaKey> {
    finding.record(key, ctx.element_id(component), key.meta().required)
}

fn document_checks(sbom: &NormalizedSbom, ctx: &RunContext) -> Vec<Record<NtiaKey>> {
    vec![
        doc(NtiaKey::SbomMachineFormat, common::machine_format(sbom)),
        doc(NtiaKey::SbomCreator, sbom_author(sbom)),
        doc(NtiaKey::SbomTimestamp, common::timestamp(sbom)),
        doc(NtiaKey::SbomDependency, common::depth(sbom, ctx)),
        doc(NtiaKey::SbomLifecycle, common::lifecycles(sbom)),
    ]
}

/// Persons or organizations first, then the manufacturer or supplier, and
/// finally the generating tools.
fn sbom_author(sbom: &NormalizedSbom) -> Finding {
    let authors = common::authors(sbom);
    if authors.passed {
        return authors;
    }
    let org = sbom
        .document
        .manufacturer
        .as_ref()
        .or(sbom.document.supplier.as_ref())
        .and_then(|o| o.display_name());
    if let Some(name) = org {
        return Finding::pass(name);
    }
    Finding::any(
        sbom.document
            .creators_of(CreatorType::Tool)
            .map(|c| c.name.as_str()),
    )
}

fn comp_supplier(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<NtiaKey> {
    comp(NtiaKey::CompSupplier, c, ctx, common::supplier(c))
}

fn comp_name(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<NtiaKey> {
    comp(NtiaKey::CompName, c, ctx, common::name(c))
}

fn comp_version(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<NtiaKey> {
    comp(NtiaKey::CompVersion, c, ctx, common::version(c))
}

fn comp_other_uniq_ids(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<NtiaKey> {
    comp(NtiaKey::CompOtherUniqIds, c, ctx, common::unique_ids(c))
}

fn comp_dependencies(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<NtiaKey> {
    comp(NtiaKey::CompDependencies, c, ctx, common::dependencies(c, ctx))
}

fn comp_hash(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<NtiaKey> {
    comp(NtiaKey::CompHash, c, ctx, common::hash_matching(c, |_| true))
}

fn comp_license(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<NtiaKey> {
    comp(
        NtiaKey::CompLicense,
        c,
        ctx,
        common::licenses_valid(c.licenses.asserted()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::section::validate_metadata;
    use crate::compliance::standard::evaluate;
    use crate::model::{
        CanonicalId, Creator, DependencyEdge, DependencyType, Hash, HashAlgorithm,
        LicenseExpression, Organization,
    };

    fn minimal_sbom() -> NormalizedSbom {
        let mut sbom = NormalizedSbom::default();
        sbom.document.spec_version = "1.5".into();
        sbom.document
            .creators
            .push(Creator::new(CreatorType::Person, "Jane"));
        sbom.document.created = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .ok()
            .map(|d| d.with_timezone(&chrono::Utc));

        let mut app = Component::new("app".into(), "app".into()).with_version("1.0".into());
        app.supplier = Some(Organization::new("Acme".into()));
        app.identifiers.purl = Some("pkg:generic/app@1.0".into());
        let mut lib = Component::new("lib".into(), "lib".into()).with_version("2.0".into());
        lib.supplier = Some(Organization::new("Upstream".into()));
        lib.identifiers.purl = Some("pkg:cargo/lib@2.0".into());
        lib.hashes.push(Hash {
            algorithm: HashAlgorithm::Sha256,
            value: "ab".into(),
        });
        lib.licenses
            .add_declared(LicenseExpression::new("MIT".into()));
        sbom.add_component(app);
        sbom.add_component(lib);
        sbom.set_primary_component(CanonicalId::from_format_id("app"));
        sbom.add_edge(DependencyEdge::new(
            CanonicalId::from_format_id("app"),
            CanonicalId::from_format_id("lib"),
            DependencyType::DependsOn,
        ));
        sbom
    }

    #[test]
    fn test_metadata_covers_every_key() {
        let meta = Ntia.metadata();
        assert_eq!(meta.len(), NtiaKey::all().len());
        assert!(validate_metadata(&meta, "ntia").is_ok());
    }

    #[test]
    fn test_required_fields_all_pass() {
        let report = evaluate(&Ntia, &minimal_sbom()).unwrap();
        let failing_required: Vec<_> = report
            .sections
            .iter()
            .filter(|s| s.required && s.score < 10.0)
            .collect();
        assert!(failing_required.is_empty(), "{failing_required:?}");
        assert_eq!(report.summary.required_elements_score, 10.0);
    }

    #[test]
    fn test_missing_timestamp_fails_doc_row() {
        let mut sbom = minimal_sbom();
        sbom.document.created = None;
        let report = evaluate(&Ntia, &sbom).unwrap();
        let row = report
            .sections
            .iter()
            .find(|s| s.section_data_field == "Timestamp")
            .unwrap();
        assert_eq!(row.element_id, "SBOM Level");
        assert_eq!(row.element_result, "missing");
        assert_eq!(row.score, 0.0);
    }

    #[test]
    fn test_author_falls_back_to_tools() {
        let mut sbom = NormalizedSbom::default();
        sbom.document
            .creators
            .push(Creator::new(CreatorType::Tool, "syft"));
        assert_eq!(sbom_author(&sbom), Finding::pass("syft"));
    }

    #[test]
    fn test_optional_rows_are_not_required() {
        let report = evaluate(&Ntia, &minimal_sbom()).unwrap();
        let license_rows: Vec<_> = report
            .sections
            .iter()
            .filter(|s| s.section_data_field == "License")
            .collect();
        assert_eq!(license_rows.len(), 2);
        assert!(license_rows.iter().all(|s| !s.required));
    }
}
