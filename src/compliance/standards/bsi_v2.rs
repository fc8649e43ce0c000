//! BSI TR-03183-2 v2.0.
//!
//! Compared with 1.1 this version raises the minimum format versions,
//! requires the artifact file name, SHA-512 hashes and the executable /
//! archive / structured properties, separates associated, concluded and
//! declared licences, and forbids embedding vulnerability data.

use super::common::{self, Finding};
use crate::compliance::check::Check;
use crate::compliance::context::RunContext;
use crate::compliance::record::{CheckKey, Record};
use crate::compliance::report::StandardDescriptor;
use crate::compliance::section::SectionMeta;
use crate::compliance::standard::Standard;
use crate::model::{Component, HashAlgorithm, NormalizedSbom};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BsiV2Key {
    SbomSpec,
    SbomSpecVersion,
    SbomBuild,
    SbomDepth,
    SbomCreator,
    SbomTimestamp,
    SbomUri,
    SbomBomLinks,
    SbomVulnerabilities,
    SbomSignature,
    CompCreator,
    CompName,
    CompVersion,
    CompFilename,
    CompDependencies,
    CompAssociatedLicense,
    CompHash,
    CompExecutable,
    CompArchive,
    CompStructured,
    CompSourceCodeUri,
    CompDeployableUri,
    CompOtherUniqIds,
    CompConcludedLicense,
    CompDeclaredLicense,
}

const FORMATS: &str = "SBOM formats";
const DETAIL: &str = "Level of Detail";
const SBOM_REQUIRED: &str = "Required SBOM fields";
const COMP_REQUIRED: &str = "Required Component fields";
const SBOM_ADDITIONAL: &str = "Additional SBOM fields";
const COMP_ADDITIONAL: &str = "Additional Component fields";
const EXCLUDED: &str = "Information not part of the SBOM";
const INTEGRITY: &str = "SBOM integrity";

impl BsiV2Key {
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
            Self::SbomBomLinks => SectionMeta::new(SBOM_ADDITIONAL, "5.2.3", false, "BOM links"),
            Self::SbomVulnerabilities => {
                SectionMeta::new(EXCLUDED, "5.4", true, "Vulnerabilities")
            }
            Self::SbomSignature => SectionMeta::new(INTEGRITY, "5.5", false, "Digital signature"),
            Self::CompCreator => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Component creator"),
            Self::CompName => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Component name"),
            Self::CompVersion => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Component version"),
            Self::CompFilename => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Filename of the component"),
            Self::CompDependencies => {
                SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Dependencies on other components")
            }
            Self::CompAssociatedLicense => {
                SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Distribution licences")
            }
            Self::CompHash => SectionMeta::new(
                COMP_REQUIRED,
                "5.2.2",
                true,
                "Hash value of the deployable component",
            ),
            Self::CompExecutable => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Executable property"),
            Self::CompArchive => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Archive property"),
            Self::CompStructured => SectionMeta::new(COMP_REQUIRED, "5.2.2", true, "Structured property"),
            Self::CompSourceCodeUri => {
                SectionMeta::new(COMP_ADDITIONAL, "5.2.4", false, "Source code URI")
            }
            Self::CompDeployableUri => {
                SectionMeta::new(COMP_ADDITIONAL, "5.2.4", false, "URI of the deployable form")
            }
            Self::CompOtherUniqIds => {
                SectionMeta::new(COMP_ADDITIONAL, "5.2.4", false, "Other unique identifiers")
            }
            Self::CompConcludedLicense => {
                SectionMeta::new(COMP_ADDITIONAL, "5.2.4", false, "Concluded licences")
            }
            Self::CompDeclaredLicense => {
                SectionMeta::new(COMP_ADDITIONAL, "5.2.4", false, "Original licences")
            }
        }
    }
}

impl CheckKey for BsiV2Key {
    fn all() -> &'static [Self] {
        &[
            Self::SbomSpec,
            Self::SbomSpecVersion,
            Self::SbomBuild,
            Self::SbomDepth,
            Self::SbomCreator,
            Self::SbomTimestamp,
            Self::SbomUri,
            Self::SbomBomLinks,
            Self::SbomVulnerabilities,
            Self::SbomSignature,
            Self::CompCreator,
            Self::CompName,
            Self::CompVersion,
            Self::CompFilename,
            Self::CompDependencies,
            Self::CompAssociatedLicense,
            Self::CompHash,
            Self::CompExecutable,
            Self::CompArchive,
            Self::CompStructured,
            Self::CompSourceCodeUri,
            Self::CompDeployableUri,
            Self::CompOtherUniqIds,
            Self::CompConcludedLicense,
            Self::CompDeclaredLicense,
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
            Self::SbomBomLinks => "SbomBomLinks",
            Self::SbomVulnerabilities => "SbomVulnerabilities",
            Self::SbomSignature => "SbomSignature",
            Self::CompCreator => "CompCreator",
            Self::CompName => "CompName",
            Self::CompVersion => "CompVersion",
            Self::CompFilename => "CompFilename",
            Self::CompDependencies => "CompDependencies",
            Self::CompAssociatedLicense => "CompAssociatedLicense",
            Self::CompHash => "CompHash",
            Self::CompExecutable => "CompExecutable",
            Self::CompArchive => "CompArchive",
            Self::CompStructured => "CompStructured",
            Self::CompSourceCodeUri => "CompSourceCodeUri",
            Self::CompDeployableUri => "CompDeployableUri",
            Self::CompOtherUniqIds => "CompOtherUniqIds",
            Self::CompConcludedLicense => "CompConcludedLicense",
            Self::CompDeclaredLicense => "CompDeclaredLicense",
        }
    }
}

const MIN_CYCLONEDX: &str = "1.5";
const MIN_SPDX: &str = "2.2.1";

/// Component property names and the values each accepts.
const EXECUTABLE_PROPERTY: (&str, &[&str]) = (
    "bsi:component:executable",
    &["executable", "non-executable"],
);
const ARCHIVE_PROPERTY: (&str, &[&str]) = ("bsi:component:archive", &["archive", "no archive"]);
const STRUCTURED_PROPERTY: (&str, &[&str]) =
    ("bsi:component:structured", &["structured", "unstructured"]);

/// BSI TR-03183-2 version 2.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct BsiV2;

impl Standard for BsiV2 {
    type Key = BsiV2Key;

    fn descriptor(&self) -> StandardDescriptor {
        StandardDescriptor {
            report_name: "BSI TR-03183-2 v2.0 Compliance Report",
            subtitle: "Part 2: Software Bill of Materials (SBOM)",
            revision: "TR-03183-2 (2.0.0)",
            short_name: "BSI TR-03183-2 v2.0",
        }
    }

    fn checks(&self) -> Vec<Check<BsiV2Key>> {
        vec![
            Check::Document(document_checks),
            Check::Component(comp_creator),
            Check::Component(comp_name),
            Check::Component(comp_version),
            Check::Component(comp_filename),
            Check::Component(comp_dependencies),
            Check::Component(comp_associated_license),
            Check::Component(comp_hash),
            Check::Component(comp_executable),
            Check::Component(comp_archive),
            Check::Component(comp_structured),
            Check::Component(comp_source_uri),
            Check::Component(comp_deployable_uri),
            Check::Component(comp_other_ids),
            Check::Component(comp_concluded_license),
            Check::Component(comp_declared_license),
        ]
    }

    fn metadata(&self) -> HashMap<BsiV2Key, SectionMeta> {
        BsiV2Key::all().iter().map(|k| (*k, k.meta())).collect()
    }
}

fn doc(key: BsiV2Key, finding: Finding) -> Record<BsiV2Key> {
    finding.doc(key, key.meta().required)
}

fn comp(key: BsiV2Key, c: &Component, ctx: &RunContext, finding: Finding) -> Record<BsiV2Key> {
    finding.record(key, ctx.element_id(c), key.meta().required)
}

fn document_checks(sbom: &NormalizedSbom, ctx: &RunContext) -> Vec<Record<BsiV2Key>> {
    vec![
        doc(BsiV2Key::SbomSpec, common::spec(sbom)),
        doc(
            BsiV2Key::SbomSpecVersion,
            common::spec_version(sbom, MIN_CYCLONEDX, MIN_SPDX),
        ),
        doc(BsiV2Key::SbomBuild, common::build_phase(sbom)),
        doc(BsiV2Key::SbomDepth, common::depth(sbom, ctx)),
        doc(BsiV2Key::SbomCreator, common::creator_contact(sbom)),
        doc(BsiV2Key::SbomTimestamp, common::timestamp(sbom)),
        doc(BsiV2Key::SbomUri, common::sbom_uri(sbom)),
        doc(BsiV2Key::SbomBomLinks, Finding::any(&sbom.document.bom_links)),
        doc(BsiV2Key::SbomVulnerabilities, no_vulnerabilities(sbom)),
        doc(BsiV2Key::SbomSignature, signature(sbom)),
    ]
}

/// Vulnerability data belongs in a separate document (CSAF/VEX).
fn no_vulnerabilities(sbom: &NormalizedSbom) -> Finding {
    match sbom.vulnerabilities.len() {
        0 => Finding::pass("none"),
        n => Finding::fail(format!("{n} vulnerabilities embedded")),
    }
}

/// Presence only; the signature is not verified.
fn signature(sbom: &NormalizedSbom) -> Finding {
    if sbom.document.has_signature {
        Finding::pass("present")
    } else {
        Finding::missing()
    }
}

fn property(c: &Component, (name, accepted): (&str, &[&str])) -> Finding {
    match common::non_blank(c.property(name)) {
        Some(v) if accepted.iter().any(|a| a.eq_ignore_ascii_case(v)) => Finding::pass(v),
        Some(v) => Finding::fail(v),
        None => Finding::missing(),
    }
}

fn comp_creator(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompCreator, c, ctx, common::component_contact(c))
}

fn comp_name(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompName, c, ctx, common::name(c))
}

fn comp_version(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompVersion, c, ctx, common::version(c))
}

fn comp_filename(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(
        BsiV2Key::CompFilename,
        c,
        ctx,
        Finding::present(c.filename.as_deref()),
    )
}

fn comp_dependencies(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompDependencies, c, ctx, common::dependencies(c, ctx))
}

/// The licences the component is distributed under, from whichever of the
/// declared or concluded fields carries them.
fn comp_associated_license(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<BsiV2Key> {
    comp(
        BsiV2Key::CompAssociatedLicense,
        c,
        ctx,
        common::licenses_valid(c.licenses.asserted()),
    )
}

fn comp_concluded_license(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<BsiV2Key> {
    comp(
        BsiV2Key::CompConcludedLicense,
        c,
        ctx,
        common::licenses_valid(c.licenses.concluded.as_ref()),
    )
}

fn comp_declared_license(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<BsiV2Key> {
    comp(
        BsiV2Key::CompDeclaredLicense,
        c,
        ctx,
        common::licenses_valid(&c.licenses.declared),
    )
}

fn comp_hash(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(
        BsiV2Key::CompHash,
        c,
        ctx,
        common::hash_matching(c, |a| *a == HashAlgorithm::Sha512),
    )
}

fn comp_executable(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompExecutable, c, ctx, property(c, EXECUTABLE_PROPERTY))
}

fn comp_archive(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompArchive, c, ctx, property(c, ARCHIVE_PROPERTY))
}

fn comp_structured(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompStructured, c, ctx, property(c, STRUCTURED_PROPERTY))
}

fn comp_source_uri(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompSourceCodeUri, c, ctx, common::source_code_uri(c))
}

fn comp_deployable_uri(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompDeployableUri, c, ctx, common::distribution_uri(c))
}

fn comp_other_ids(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<BsiV2Key> {
    comp(BsiV2Key::CompOtherUniqIds, c, ctx, common::unique_ids(c))
}
