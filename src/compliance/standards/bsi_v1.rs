//! BSI TR-03183-2 v1.1.

use super::common::{self, Finding};
use crate::compliance::check::Check;
use crate::compliance::context::RunContext;
use crate::compliance::record::{CheckKey, Record};
use crate::compliance::report::StandardDescriptor;
use crate::compliance::section::SectionMeta;
use crate::compliance::standard::Standard;
use crate::model::{Component, NormalizedSbom};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BsiV1Key {
    SbomSpec,
    SbomSpecVersion,
    SbomBuild,
    SbomDepth,
    SbomCreator,
    SbomTimestamp,
    SbomUri,
    CompCreator,
    CompName,
    CompVersion,
    CompDependencies,
    CompLicense,
    CompHash,
    CompSourceCodeUri,
    CompExecutableUri,
    CompSourceHash,
    CompOtherUniqIds,
}

const FORMATS: &str = "SBOM formats";
const DETAIL: &str = "Level of Detail";
const SBOM_REQUIRED: &str = "Required SBOM fields";
const COMP_REQUIRED: &str = "Required Component fields";
const SBOM_ADDITIONAL: &str = "Additional SBOM fields";
const COMP_ADDITIONAL: &str = "Additional Component fields";

impl BsiV1Key {
    #[must_use]
    pub const fn meta(self) -> SectionMeta {
        match self {
            Self::SbomSpec => SectionMeta::new(FORMATS, "4", true, "Specification"),
            Self::SbomSpecVersion => SectionMeta::new(FORMATS, "4", true, "Specification Version"),
            Self::SbomBuild => SectionMeta::new(DETAIL, "5.1", true, "Build process"),
            Self::SbomDepth => SectionMeta::new(DETAIL, "5.1", true, "Depth"),
            Self::SbomCreator => SectionMeta::new(SBOM_REQUIRED, "5.2.1", true, "Creator of the SBOM"),
            Self::SbomTimestamp => SectionMeta::new(SBOM_REQUIRED, "5.2.1", true, "Timestamp"),
            Self::SbomUri => SectionMeta::new(SBOM_ADDITIONAL, "5.2.3", false, "SBOM-URI"),
            Self::CompCreator => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Component creator"),
            Self::CompName => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Component name"),
            Self::CompVersion => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Component version"),
            Self::CompDependencies => {
                SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Dependencies on other components")
            }
            Self::CompLicense => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "License"),
            Self::CompHash => SectionMeta::new(
                COMP_REQUIRED,
                "5.2.2",
                true,
                "Hash value of the executable component",
            ),
            Self::CompSourceCodeUri => {
                SectionMeta::new(COMP_ADDITIONAL, "5.2.4", false, "Source code URI")
            }
            Self::CompExecutableUri => {
                SectionMeta::new(COMP_ADDITIONAL, "5.2.4", false, "URI of the executable form")
            }
            Self::CompSourceHash => {
                SectionMeta::new(COMP_ADDITIONAL, "5.2.4", false, "Hash value of the source code")
            }
            Self::CompOtherUniqIds => {
                SectionMeta::new(COMP_ADDITIONAL, "5.2.4", false, "Other unique identifiers")
            }
        }
    }
}

impl CheckKey for BsiV1Key {
    fn all() -> &'static [Self] {
        &[
            Self::SbomSpec,
            Self::SbomSpecVersion,
            Self::SbomBuild,
            Self::SbomDepth,
            Self::SbomCreator,
            Self::SbomTimestamp,
            Self::SbomUri,
            Self::CompCreator,
            Self::CompName,
            Self::CompVersion,
            Self::CompDependencies,
            Self::CompLicense,
            Self::CompHash,
            Self::CompSourceCodeUri,
            Self::CompExecutableUri,
            Self::CompSourceHash,
            Self::CompOtherUniqIds,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::SbomSpec => "SbomSpec",
            Self::SbomSpecVersion => "SbomSpecVersion",
            Self::SbomBuild => "SbomBuild",
            Self::SbomDepth => "SbomDepth",
            Self::SbomCreator => "SbomCreator",
            Self::SbomTimestamp => "SbomTimestamp",
            Self::SbomUri => "SbomUri",
            Self::CompCreator => "CompCreator",
            Self::CompName => "CompName",
            Self::CompVersion => "CompVersion",
            Self::CompDependencies => "CompDependencies",
            Self::CompLicense => "CompLicense",
            Self::CompHash => "CompHash",
            Self::CompSourceCodeUri => "CompSourceCodeUri",
            Self::CompExecutableUri => "CompExecutableUri",
            Self::CompSourceHash => "CompSourceHash",
            Self::CompOtherUniqIds => "CompOtherUniqIds",
        }
    }
}

/// Minimum accepted format versions.
const MIN_CYCLONEDX: &str = "1.4";
const MIN_SPDX: &str = "2.3";

/// BSI TR-03183-2 version 1.1.
#[derive(Debug, Clone, Copy, Default)]
pub struct BsiV1;

impl Standard for BsiV1 {
    type Key = BsiV1Key;

    fn descriptor(&self) -> StandardDescriptor {
        StandardDescriptor {
            report_name: "BSI TR-03183-2 v1.1 Compliance Report",
            subtitle: "Part 2: Software Bill of Materials (SBOM)",
            revision: "TR-03183-2 (1.1)",
            short_name: "BSI TR-03183-2 v1.1",
        }
    }

    fn checks(&self) -> Vec<Check<BsiV1Key>> {
        vec![
            Check::Document(document_checks),
            Check::Component(comp_creator),
            Check::Component(comp_name),
            Check::Component(comp_version),
            Check::Component(comp_dependencies),
            Check::Component(comp_license),
            Check::Component(comp_hash),
            Check::Component(comp_source_uri),
            Check::Component(comp_executable_uri),
            Check::Component(comp_source_hash),
            Check::Component(comp_other_ids),
        ]
    }

    fn metadata(&self) -> HashMap<BsiV1Key, SectionMeta> {
        BsiV1Key::all().iter().map(|k| (*k, k.meta())).collect()
    }
}

fn doc(key: BsiV1Key, finding: Finding) -> Record<BsiV1Key> {
    finding.doc(key, key.meta().required)
}

fn comp(key: BsiV1Key, c: &Component, ctx: &RunContext, finding: Finding) -> Record<BsiV1Key> {
    finding.record(key, ctx.element_id(c), key.meta().required)
}

fn document_checks(sbom: &NormalizedSbom, ctx: &RunContext) -> Vec<Record<BsiV1Key>> {
    vec![
        doc(BsiV1Key::SbomSpec, common::spec(sbom)),
        doc(
            BsiV1Key::SbomSpecVersion,
            common::spec_version(sbom, MIN_CYCLONEDX, MIN_SPDX),
        ),
        doc(BsiV1Key::SbomBuild, common::build_phase(sbom)),
        doc(BsiV1Key::SbomDepth, common::depth(sbom, ctx)),
        doc(BsiV1Key::SbomCreator, common::creator_contact(sbom)),
        doc(BsiV1Key::SbomTimestamp, common::timestamp(sbom)),
        doc(BsiV1Key::SbomUri, common::sbom_uri(sbom)),
    ]
}

fn comp_creator(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV1Key> {
    comp(BsiV1Key::CompCreator, c, ctx, common::component_contact(c))
}

fn comp_name(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV1Key> {
    comp(BsiV1Key::CompName, c, ctx, common::name(c))
}

fn comp_version(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV1Key> {
    comp(BsiV1Key::CompVersion, c, ctx, common::version(c))
}

fn comp_dependencies(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<BsiV1Key> {
    comp(BsiV1Key::CompDependencies, c, ctx, common::dependencies(c, ctx))
}

fn comp_license(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV1Key> {
    comp(
        BsiV1Key::CompLicense,
        c,
        ctx,
        common::licenses_valid(c.licenses.all_licenses()),
    )
}

fn comp_hash(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV1Key> {
    comp(
        BsiV1Key::CompHash,
        c,
        ctx,
        common::hash_matching(c, |a| a.is_strong()),
    )
}

fn comp_source_uri(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<BsiV1Key> {
    comp(BsiV1Key::CompSourceCodeUri, c, ctx, common::source_code_uri(c))
}

fn comp_executable_uri(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<BsiV1Key> {
    comp(BsiV1Key::CompExecutableUri, c, ctx, common::distribution_uri(c))
}

fn comp_source_hash(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<BsiV1Key> {
    comp(BsiV1Key::CompSourceHash, c, ctx, common::source_hash(c))
}

fn comp_other_ids(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<BsiV1Key> {
    comp(BsiV1Key::CompOtherUniqIds, c, ctx, common::unique_ids(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::section::validate_metadata;
    use crate::compliance::standard::evaluate;
    use crate::model::{Hash, HashAlgorithm, SbomFormat};

    fn row<'a>(
        report: &'a crate::compliance::ComplianceReport,
        field: &str,
    ) -> &'a crate::compliance::Section {
        report
            .sections
            .iter()
            .find(|s| s.section_data_field == field)
            .unwrap()
    }

    #[test]
    fn test_metadata_covers_every_key() {
        let meta = BsiV1.metadata();
        assert_eq!(meta.len(), BsiV1Key::all().len());
        assert!(validate_metadata(&meta, "bsi").is_ok());
    }

    #[test]
    fn test_spec_version_thresholds() {
        let mut sbom = NormalizedSbom::default();
        sbom.document.spec_version = "1.3".into();
        let report = evaluate(&BsiV1, &sbom).unwrap();
        assert_eq!(row(&report, "Specification Version").score, 0.0);

        sbom.document.spec_version = "1.4".into();
        let report = evaluate(&BsiV1, &sbom).unwrap();
        assert_eq!(row(&report, "Specification Version").score, 10.0);

        sbom.document.format = SbomFormat::Spdx;
        sbom.document.spec_version = "2.2".into();
        let report = evaluate(&BsiV1, &sbom).unwrap();
        assert_eq!(row(&report, "Specification Version").score, 0.0);
    }

    #[test]
    fn test_build_lifecycle() {
        let mut sbom = NormalizedSbom::default();
        sbom.document.lifecycles = vec!["design".into()];
        let report = evaluate(&BsiV1, &sbom).unwrap();
        let build = row(&report, "Build process");
        assert_eq!(build.element_result, "design");
        assert_eq!(build.score, 0.0);

        sbom.document.lifecycles.push("build".into());
        let report = evaluate(&BsiV1, &sbom).unwrap();
        assert_eq!(row(&report, "Build process").score, 10.0);
    }

    #[test]
    fn test_weak_hash_fails() {
        let mut sbom = NormalizedSbom::default();
        let mut c = Component::new("a".into(), "a".into());
        c.hashes.push(Hash {
            algorithm: HashAlgorithm::Md5,
            value: "00".into(),
        });
        sbom.add_component(c);
        let report = evaluate(&BsiV1, &sbom).unwrap();
        let hash = row(&report, "Hash value of the executable component");
        assert_eq!(hash.element_id, "a");
        assert_eq!(hash.element_result, "MD5");
        assert_eq!(hash.score, 0.0);
    }
}
