//! OpenChain Telco SBOM guide v1.0.
//!
//! The guide targets SPDX only; CycloneDX documents are evaluated but fail
//! the SPDX-specific fields.

use super::common::{self, Finding};
use crate::compliance::check::Check;
use crate::compliance::context::RunContext;
use crate::compliance::record::{CheckKey, Record};
use crate::compliance::report::StandardDescriptor;
use crate::compliance::section::SectionMeta;
use crate::compliance::standard::Standard;
use crate::model::{Component, CreatorType, ExternalRefType, NormalizedSbom, SbomFormat};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OctKey {
    SbomSpec,
    SbomSpecVersion,
    SbomSpdxId,
    SbomName,
    SbomNamespace,
    SbomDataLicense,
    SbomLicenseListVersion,
    SbomCreatorOrg,
    SbomCreatorTool,
    SbomCreatedTimestamp,
    SbomComment,
    SbomMachineFormat,
    PackageName,
    PackageSpdxId,
    PackageVersion,
    PackageSupplier,
    PackageDownloadLocation,
    PackageFilesAnalyzed,
    PackageChecksum,
    PackageLicenseConcluded,
    PackageLicenseDeclared,
    PackageCopyright,
    PackagePurl,
}

const FORMAT: &str = "SBOM Format";
const CREATION: &str = "Document Creation Information";
const DATA_FORMAT: &str = "Machine Readable Data Format";
const PACKAGE: &str = "Package Information";

impl OctKey {
    #[must_use]
    pub const fn meta(self) -> SectionMeta {
        match self {
            Self::SbomSpec => SectionMeta::new(FORMAT, "3.1", true, "SBOM Format"),
            Self::SbomSpecVersion => SectionMeta::new(FORMAT, "3.2", true, "SPDX Version"),
            Self::SbomSpdxId => SectionMeta::new(CREATION, "3.3.1", true, "SPDX Identifier"),
            Self::SbomName => SectionMeta::new(CREATION, "3.3.2", true, "Document Name"),
            Self::SbomNamespace => SectionMeta::new(CREATION, "3.3.3", true, "Document Namespace"),
            Self::SbomDataLicense => SectionMeta::new(CREATION, "3.3.4", true, "Data License"),
            Self::SbomLicenseListVersion => {
                SectionMeta::new(CREATION, "3.3.5", true, "License List Version")
            }
            Self::SbomCreatorOrg => SectionMeta::new(CREATION, "3.3.6", true, "Creator: Organization"),
            Self::SbomCreatorTool => SectionMeta::new(CREATION, "3.3.7", true, "Creator: Tool"),
            Self::SbomCreatedTimestamp => SectionMeta::new(CREATION, "3.3.8", true, "Created"),
            Self::SbomComment => SectionMeta::new(CREATION, "3.3.9", false, "Creator Comment"),
            Self::SbomMachineFormat => SectionMeta::new(DATA_FORMAT, "3.4", true, "Data Format"),
            Self::PackageName => SectionMeta::new(PACKAGE, "3.5.1", true, "Package Name"),
            Self::PackageSpdxId => SectionMeta::new(PACKAGE, "3.5.2", true, "Package SPDX Identifier"),
            Self::PackageVersion => SectionMeta::new(PACKAGE, "3.5.3", true, "Package Version"),
            Self::PackageSupplier => SectionMeta::new(PACKAGE, "3.5.4", true, "Package Supplier"),
            Self::PackageDownloadLocation => {
                SectionMeta::new(PACKAGE, "3.5.5", true, "Package Download Location")
            }
            Self::PackageFilesAnalyzed => SectionMeta::new(PACKAGE, "3.5.6", true, "Files Analyzed"),
            Self::PackageChecksum => SectionMeta::new(PACKAGE, "3.5.7", true, "Package Checksum"),
            Self::PackageLicenseConcluded => {
                SectionMeta::new(PACKAGE, "3.5.8", true, "Concluded License")
            }
            Self::PackageLicenseDeclared => {
                SectionMeta::new(PACKAGE, "3.5.9", true, "Declared License")
            }
            Self::PackageCopyright => SectionMeta::new(PACKAGE, "3.5.10", true, "Copyright Text"),
            Self::PackagePurl => {
                SectionMeta::new(PACKAGE, "3.5.11", true, "External Reference: purl")
            }
        }
    }
}

impl CheckKey for OctKey {
    fn all() -> &'static [Self] {
        &[
            Self::SbomSpec,
            Self::SbomSpecVersion,
            Self::SbomSpdxId,
            Self::SbomName,
            Self::SbomNamespace,
            Self::SbomDataLicense,
            Self::SbomLicenseListVersion,
            Self::SbomCreatorOrg,
            Self::SbomCreatorTool,
            Self::SbomCreatedTimestamp,
            Self::SbomComment,
            Self::SbomMachineFormat,
            Self::PackageName,
            Self::PackageSpdxId,
            Self::PackageVersion,
            Self::PackageSupplier,
            Self::PackageDownloadLocation,
            Self::PackageFilesAnalyzed,
            Self::PackageChecksum,
            Self::PackageLicenseConcluded,
            Self::PackageLicenseDeclared,
            Self::PackageCopyright,
            Self::PackagePurl,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::SbomSpec => "SbomSpec",
            Self::SbomSpecVersion => "SbomSpecVersion",
            Self::SbomSpdxId => "SbomSpdxId",
            Self::SbomName => "SbomName",
            Self::SbomNamespace => "SbomNamespace",
            Self::SbomDataLicense => "SbomDataLicense",
            Self::SbomLicenseListVersion => "SbomLicenseListVersion",
            Self::SbomCreatorOrg => "SbomCreatorOrg",
            Self::SbomCreatorTool => "SbomCreatorTool",
            Self::SbomCreatedTimestamp => "SbomCreatedTimestamp",
            Self::SbomComment => "SbomComment",
            Self::SbomMachineFormat => "SbomMachineFormat",
            Self::PackageName => "PackageName",
            Self::PackageSpdxId => "PackageSpdxId",
            Self::PackageVersion => "PackageVersion",
            Self::PackageSupplier => "PackageSupplier",
            Self::PackageDownloadLocation => "PackageDownloadLocation",
            Self::PackageFilesAnalyzed => "PackageFilesAnalyzed",
            Self::PackageChecksum => "PackageChecksum",
            Self::PackageLicenseConcluded => "PackageLicenseConcluded",
            Self::PackageLicenseDeclared => "PackageLicenseDeclared",
            Self::PackageCopyright => "PackageCopyright",
            Self::PackagePurl => "PackagePurl",
        }
    }
}

const SUPPORTED_SPDX_VERSIONS: &[&str] = &["2.2", "2.3"];
const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";
const DATA_LICENSE: &str = "CC0-1.0";

/// OpenChain Telco SBOM guide version 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenChainTelco;

impl Standard for OpenChainTelco {
    type Key = OctKey;

    fn descriptor(&self) -> StandardDescriptor {
        StandardDescriptor {
            report_name: "OpenChain Telco Compliance Report",
            subtitle: "OpenChain Telco SBOM Guide",
            revision: "V1.0",
            short_name: "OpenChain Telco",
        }
    }

    fn checks(&self) -> Vec<Check<OctKey>> {
        vec![
            Check::Document(document_checks),
            Check::Component(package_name),
            Check::Component(package_spdx_id),
            Check::Component(package_version),
            Check::Component(package_supplier),
            Check::Component(package_download_location),
            Check::Component(package_files_analyzed),
            Check::Component(package_checksum),
            Check::Component(package_license_concluded),
            Check::Component(package_license_declared),
            Check::Component(package_copyright),
            Check::Component(package_purl),
        ]
    }

    fn metadata(&self) -> HashMap<OctKey, SectionMeta> {
        OctKey::all().iter().map(|k| (*k, k.meta())).collect()
    }
}

fn doc(key: OctKey, finding: Finding) -> Record<OctKey> {
    finding.doc(key, key.meta().required)
}

fn package(key: OctKey, c: &Component, ctx: &RunContext, finding: Finding) -> Record<OctKey> {
    finding.record(key, ctx.element_id(c), key.meta().required)
}

fn document_checks(sbom: &NormalizedSbom, _: &RunContext) -> Vec<Record<OctKey>> {
    let d = &sbom.document;
    vec![
        doc(OctKey::SbomSpec, spdx_only(sbom)),
        doc(OctKey::SbomSpecVersion, spdx_version(sbom)),
        doc(
            OctKey::SbomSpdxId,
            expect_exact(d.spdx_id.as_deref(), DOCUMENT_SPDX_ID),
        ),
        doc(OctKey::SbomName, Finding::present(d.name.as_deref())),
        doc(OctKey::SbomNamespace, namespace(sbom)),
        doc(
            OctKey::SbomDataLicense,
            expect_exact(d.data_license.as_deref(), DATA_LICENSE),
        ),
        doc(
            OctKey::SbomLicenseListVersion,
            Finding::present(d.license_list_version.as_deref()),
        ),
        doc(
            OctKey::SbomCreatorOrg,
            Finding::any(d.creators_of(CreatorType::Organization).map(|c| c.name.as_str())),
        ),
        doc(
            OctKey::SbomCreatorTool,
            Finding::any(d.creators_of(CreatorType::Tool).map(|c| c.name.as_str())),
        ),
        doc(OctKey::SbomCreatedTimestamp, common::timestamp(sbom)),
        doc(OctKey::SbomComment, Finding::present(d.comment.as_deref())),
        doc(OctKey::SbomMachineFormat, machine_format(sbom)),
    ]
}

fn is_spdx(sbom: &NormalizedSbom) -> bool {
    sbom.document.format == SbomFormat::Spdx
}

fn spdx_only(sbom: &NormalizedSbom) -> Finding {
    let spec = common::spec(sbom);
    if is_spdx(sbom) {
        spec
    } else {
        Finding::fail(spec.value)
    }
}

fn spdx_version(sbom: &NormalizedSbom) -> Finding {
    let version = sbom.document.spec_version.trim().trim_start_matches("SPDX-");
    if version.is_empty() {
        return Finding::missing();
    }
    if is_spdx(sbom) && SUPPORTED_SPDX_VERSIONS.contains(&version) {
        Finding::pass(version)
    } else {
        Finding::fail(version)
    }
}

fn namespace(sbom: &NormalizedSbom) -> Finding {
    if !is_spdx(sbom) {
        return Finding::missing();
    }
    common::sbom_uri(sbom)
}

fn expect_exact(value: Option<&str>, expected: &str) -> Finding {
    match common::non_blank(value) {
        Some(v) if v == expected => Finding::pass(v),
        Some(v) => Finding::fail(v),
        None => Finding::missing(),
    }
}

/// SPDX JSON or tag-value.
fn machine_format(sbom: &NormalizedSbom) -> Finding {
    let label = format!("{}, {}", sbom.document.format, sbom.document.file_format);
    if is_spdx(sbom) {
        Finding::pass(label)
    } else {
        Finding::fail(label)
    }
}

fn package_name(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<OctKey> {
    package(OctKey::PackageName, c, ctx, common::name(c))
}

fn package_spdx_id(sbom: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<OctKey> {
    let id = c.identifiers.format_id.as_str();
    let finding = if is_spdx(sbom) && id.starts_with("SPDXRef-") {
        Finding::pass(id)
    } else {
        Finding::fail(id)
    };
    package(OctKey::PackageSpdxId, c, ctx, finding)
}

fn package_version(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<OctKey> {
    package(OctKey::PackageVersion, c, ctx, common::version(c))
}

fn package_supplier(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<OctKey> {
    package(OctKey::PackageSupplier, c, ctx, common::supplier(c))
}

/// `NOASSERTION` is an acceptable value; only absence fails.
fn package_download_location(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<OctKey> {
    package(
        OctKey::PackageDownloadLocation,
        c,
        ctx,
        Finding::present(c.download_location.as_deref()),
    )
}

fn package_files_analyzed(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<OctKey> {
    let finding = match c.files_analyzed {
        Some(v) => Finding::pass(v.to_string()),
        None => Finding::missing(),
    };
    package(OctKey::PackageFilesAnalyzed, c, ctx, finding)
}

fn package_checksum(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<OctKey> {
    package(
        OctKey::PackageChecksum,
        c,
        ctx,
        Finding::any(c.hashes.iter().map(|h| h.algorithm.to_string())),
    )
}

fn package_license_concluded(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<OctKey> {
    let finding = Finding::present(c.licenses.concluded.as_ref().map(|l| l.expression.as_str()));
    package(OctKey::PackageLicenseConcluded, c, ctx, finding)
}

fn package_license_declared(
    _: &NormalizedSbom,
    c: &Component,
    ctx: &RunContext,
) -> Record<OctKey> {
    let finding = Finding::any(c.licenses.declared.iter().map(|l| l.expression.as_str()));
    package(OctKey::PackageLicenseDeclared, c, ctx, finding)
}

fn package_copyright(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<OctKey> {
    package(
        OctKey::PackageCopyright,
        c,
        ctx,
        Finding::present(c.copyright.as_deref()),
    )
}

fn package_purl(_: &NormalizedSbom, c: &Component, ctx: &RunContext) -> Record<OctKey> {
    let from_refs = common::join(c.refs_of(&ExternalRefType::Purl).map(|r| r.url.as_str()));
    let finding = if !from_refs.is_empty() {
        Finding::pass(from_refs)
    } else if c.identifiers.has_valid_purl() {
        Finding::present(c.identifiers.purl.as_deref())
    } else {
        Finding::missing()
    };
    package(OctKey::PackagePurl, c, ctx, finding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::section::validate_metadata;
    use crate::compliance::standard::evaluate;
    use crate::model::{Creator, LicenseExpression};

    fn spdx_doc() -> NormalizedSbom {
        let mut sbom = NormalizedSbom::default();
        sbom.document.format = SbomFormat::Spdx;
        sbom.document.spec_version = "SPDX-2.3".into();
        sbom.document.spdx_id = Some(DOCUMENT_SPDX_ID.into());
        sbom.document.name = Some("acme-firmware".into());
        sbom.document.serial_number = Some("https://acme.example/spdx/fw-1".into());
        sbom.document.data_license = Some("CC0-1.0".into());
        sbom.document.license_list_version = Some("3.21".into());
        sbom.document
            .creators
            .push(Creator::new(CreatorType::Organization, "Acme"));
        sbom.document
            .creators
            .push(Creator::new(CreatorType::Tool, "spdx-gen-1.0"));
        sbom.document.created = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .ok()
            .map(|d| d.with_timezone(&chrono::Utc));
        sbom
    }

    #[test]
    fn test_metadata_covers_every_key() {
        let meta = OpenChainTelco.metadata();
        assert_eq!(meta.len(), OctKey::all().len());
        assert!(validate_metadata(&meta, "oct").is_ok());
    }

    #[test]
    fn test_complete_spdx_document_level() {
        let report = evaluate(&OpenChainTelco, &spdx_doc()).unwrap();
        let failing: Vec<_> = report
            .sections
            .iter()
            .filter(|s| s.required && s.score < 10.0)
            .collect();
        assert!(failing.is_empty(), "{failing:?}");
        assert_eq!(report.summary.required_elements_score, 10.0);
        assert_eq!(report.summary.optional_elements_score, 0.0);
    }

    #[test]
    fn test_cyclonedx_fails_spdx_rows() {
        let mut sbom = NormalizedSbom::default();
        sbom.document.spec_version = "1.5".into();
        let records = document_checks(&sbom, &RunContext::default());
        let spec = records
            .iter()
            .find(|r| r.check_key() == OctKey::SbomSpec)
            .unwrap();
        assert_eq!(spec.score(), 0.0);
        assert_eq!(spec.check_value(), "cyclonedx");
    }

    #[test]
    fn test_wrong_data_license() {
        assert!(!expect_exact(Some("MIT"), DATA_LICENSE).passed);
        assert_eq!(expect_exact(None, DATA_LICENSE), Finding::missing());
    }

    #[test]
    fn test_noassertion_package_fields_are_present() {
        let mut sbom = spdx_doc();
        let mut pkg = Component::new("busybox".into(), "SPDXRef-busybox".into());
        pkg.download_location = Some("NOASSERTION".into());
        pkg.licenses.concluded = Some(LicenseExpression::new("NOASSERTION".into()));
        pkg.files_analyzed = Some(false);
        sbom.add_component(pkg);
        let ctx = RunContext::new(&sbom);
        let c = sbom.components.values().next().unwrap();

        assert_eq!(package_download_location(&sbom, c, &ctx).score(), 10.0);
        assert_eq!(package_license_concluded(&sbom, c, &ctx).score(), 10.0);
        assert_eq!(package_files_analyzed(&sbom, c, &ctx).check_value(), "false");
        assert_eq!(package_spdx_id(&sbom, c, &ctx).score(), 10.0);
        assert_eq!(package_copyright(&sbom, c, &ctx).score(), 0.0);
    }
}
