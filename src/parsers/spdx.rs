//! SPDX SBOM parser.
//!
//! Reads SPDX 2.x documents in JSON and tag-value form. Both forms are read
//! into the same deserialization structs before normalization.

use crate::model::{
    CanonicalId, Component, ComponentType, Contact, Creator, CreatorType, DependencyEdge,
    DependencyType, DocumentMetadata, ExternalRefType, ExternalReference, FileFormat, Hash,
    HashAlgorithm, LicenseExpression, NormalizedSbom, Organization, SbomFormat,
};
use crate::parsers::traits::{
    parse_timestamp, sniff_json_string, FormatConfidence, FormatDetection, ParseError, SbomParser,
};
use serde::Deserialize;
use std::collections::HashMap;

const DOCUMENT_REF: &str = "SPDXRef-DOCUMENT";

/// Parser for SPDX SBOM format
#[derive(Debug, Default)]
pub struct SpdxParser;

impl SpdxParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parse_json(&self, content: &str) -> Result<NormalizedSbom, ParseError> {
        let spdx: SpdxDocument =
            serde_json::from_str(content).map_err(|e| ParseError::JsonError(e.to_string()))?;
        self.convert_to_normalized(spdx, FileFormat::Json)
    }

    fn parse_tag_value(&self, content: &str) -> Result<NormalizedSbom, ParseError> {
        let spdx = parse_tag_value_format(content)?;
        self.convert_to_normalized(spdx, FileFormat::TagValue)
    }

    fn convert_to_normalized(
        &self,
        spdx: SpdxDocument,
        file_format: FileFormat,
    ) -> Result<NormalizedSbom, ParseError> {
        let document = self.convert_metadata(&spdx, file_format);
        let mut sbom = NormalizedSbom::new(document);
        let mut id_map: HashMap<String, CanonicalId> = HashMap::new();

        for pkg in &spdx.packages {
            let comp = self.convert_package(pkg);
            id_map.insert(pkg.spdx_id.clone(), comp.canonical_id.clone());
            sbom.add_component(comp);
        }

        let doc_id = if spdx.spdx_id.is_empty() {
            DOCUMENT_REF
        } else {
            spdx.spdx_id.as_str()
        };

        let described = spdx.document_describes.iter().map(String::as_str).chain(
            spdx.relationships
                .iter()
                .filter(|r| {
                    r.relationship_type.eq_ignore_ascii_case("DESCRIBES")
                        && r.spdx_element_id == doc_id
                })
                .map(|r| r.related_spdx_element.as_str()),
        );
        for target in described {
            if let Some(primary_id) = id_map.get(target) {
                sbom.set_primary_component(primary_id.clone());
                break;
            }
        }

        for rel in &spdx.relationships {
            let dep_type = DependencyType::from_spdx(&rel.relationship_type);
            // "X_DEPENDENCY_OF" points from the dependency to its dependent.
            let reversed = rel.relationship_type.to_uppercase().ends_with("_OF");
            let (from, to) = if reversed {
                (&rel.related_spdx_element, &rel.spdx_element_id)
            } else {
                (&rel.spdx_element_id, &rel.related_spdx_element)
            };
            if let (Some(from_id), Some(to_id)) = (id_map.get(from), id_map.get(to)) {
                sbom.add_edge(DependencyEdge::new(from_id.clone(), to_id.clone(), dep_type));
            }
        }

        sbom.log_collision_summary();
        sbom.calculate_content_hash();
        Ok(sbom)
    }

    fn convert_metadata(&self, spdx: &SpdxDocument, file_format: FileFormat) -> DocumentMetadata {
        let version = spdx
            .spdx_version
            .strip_prefix("SPDX-")
            .unwrap_or(&spdx.spdx_version)
            .to_string();

        let creation_info = spdx.creation_info.as_ref();
        let creators = creation_info
            .map(|ci| ci.creators.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|raw| parse_creator(raw))
            .collect();

        let comment = spdx
            .comment
            .clone()
            .or_else(|| creation_info.and_then(|ci| ci.comment.clone()));

        DocumentMetadata {
            format: SbomFormat::Spdx,
            file_format,
            spec_version: version,
            serial_number: spdx.document_namespace.clone(),
            spdx_id: non_empty(&spdx.spdx_id),
            name: non_empty(&spdx.name),
            data_license: non_empty(&spdx.data_license),
            license_list_version: creation_info.and_then(|ci| ci.license_list_version.clone()),
            comment,
            created: parse_timestamp(creation_info.and_then(|ci| ci.created.as_deref())),
            creators,
            supplier: None,
            manufacturer: None,
            lifecycles: Vec::new(),
            has_signature: false,
            completeness: Default::default(),
            bom_links: spdx
                .external_document_refs
                .iter()
                .map(|r| r.spdx_document.clone())
                .collect(),
        }
    }

    fn convert_package(&self, pkg: &SpdxPackage) -> Component {
        let mut comp = Component::new(pkg.name.clone(), pkg.spdx_id.clone());

        if let Some(version) = &pkg.version_info {
            comp = comp.with_version(version.clone());
        }

        for ext_ref in &pkg.external_refs {
            let ref_type = ExternalRefType::parse(&ext_ref.reference_type);
            match ref_type {
                ExternalRefType::Purl
                    if comp.identifiers.purl.is_none()
                        && is_package_manager(&ext_ref.reference_category) =>
                {
                    comp = comp.with_purl(ext_ref.reference_locator.clone());
                }
                ExternalRefType::Cpe => {
                    comp.identifiers
                        .cpe
                        .push(ext_ref.reference_locator.clone());
                }
                ExternalRefType::Other(ref t) if t == "swid" => {
                    comp.identifiers.swid = Some(ext_ref.reference_locator.clone());
                }
                _ => {}
            }
            comp.external_refs.push(ExternalReference::new(
                ref_type,
                ext_ref.reference_locator.clone(),
            ));
        }

        if let Some(purpose) = &pkg.primary_package_purpose {
            comp.component_type = ComponentType::parse(purpose);
        }

        if let Some(declared) = pkg.license_declared.as_deref().and_then(non_empty) {
            comp.licenses.add_declared(LicenseExpression::new(declared));
        }
        comp.licenses.concluded = pkg
            .license_concluded
            .as_deref()
            .and_then(non_empty)
            .map(LicenseExpression::new);

        comp.supplier = pkg.supplier.as_deref().and_then(parse_organization);
        comp.author = pkg
            .originator
            .as_deref()
            .and_then(parse_creator)
            .map(|c| c.name);

        for checksum in &pkg.checksums {
            comp.hashes.push(Hash::new(
                HashAlgorithm::parse(&checksum.algorithm),
                checksum.checksum_value.clone(),
            ));
        }

        comp.download_location = pkg.download_location.as_deref().and_then(non_empty);
        comp.files_analyzed = pkg.files_analyzed;
        comp.filename = pkg.package_file_name.as_deref().and_then(non_empty);
        comp.description.clone_from(&pkg.description);
        comp.copyright = pkg.copyright_text.as_deref().and_then(non_empty);

        comp.calculate_content_hash();
        comp
    }
}

impl SbomParser for SpdxParser {
    fn parse_str(&self, content: &str) -> Result<NormalizedSbom, ParseError> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') {
            self.parse_json(content)
        } else if looks_like_tag_value(content) {
            self.parse_tag_value(content)
        } else {
            Err(ParseError::UnknownFormat(
                "Expected JSON or tag-value SPDX format".to_string(),
            ))
        }
    }

    fn supported_versions(&self) -> Vec<&str> {
        vec!["2.1", "2.2", "2.3"]
    }

    fn format_name(&self) -> &str {
        "SPDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let trimmed = content.trim_start();

        if trimmed.starts_with('{') {
            let has_spdx_version = content.contains("\"spdxVersion\"");
            let has_spdx_id = content.contains("\"SPDXID\"");
            let has_data_license = content.contains("\"dataLicense\"");
            let version = sniff_json_string(content, "spdxVersion")
                .map(|v| v.trim_start_matches("SPDX-").to_string());

            let detection = if has_spdx_version && has_spdx_id {
                FormatDetection::with_confidence(FormatConfidence::CERTAIN).variant("JSON")
            } else if has_spdx_version || (has_spdx_id && has_data_license) {
                FormatDetection::with_confidence(FormatConfidence::HIGH).variant("JSON")
            } else if content.contains("\"packages\"") && has_data_license {
                FormatDetection::with_confidence(FormatConfidence::MEDIUM)
                    .variant("JSON")
                    .warning("Missing spdxVersion field")
            } else {
                return FormatDetection::no_match();
            };
            return match version {
                Some(v) => detection.version(&v),
                None => detection,
            };
        }

        if looks_like_tag_value(content) {
            let version = content.lines().find_map(|line| {
                line.trim()
                    .strip_prefix("SPDXVersion:")
                    .map(|v| v.trim().trim_start_matches("SPDX-").to_string())
            });
            let confidence = if content.contains("SPDXID:") && content.contains("DataLicense:") {
                FormatConfidence::CERTAIN
            } else {
                FormatConfidence::HIGH
            };
            let detection = FormatDetection::with_confidence(confidence).variant("tag-value");
            return match version {
                Some(v) => detection.version(&v),
                None => detection,
            };
        }

        FormatDetection::no_match()
    }
}

fn looks_like_tag_value(content: &str) -> bool {
    content.trim_start().starts_with("SPDXVersion:") || content.contains("\nSPDXVersion:")
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Split an SPDX actor (`Organization: Acme (ops@acme.example)`) into its
/// type, name and optional email.
fn parse_actor(raw: &str) -> Option<(CreatorType, String, Option<String>)> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("NOASSERTION") {
        return None;
    }
    let (creator_type, rest) = if let Some(rest) = raw.strip_prefix("Tool:") {
        (CreatorType::Tool, rest)
    } else if let Some(rest) = raw.strip_prefix("Organization:") {
        (CreatorType::Organization, rest)
    } else if let Some(rest) = raw.strip_prefix("Person:") {
        (CreatorType::Person, rest)
    } else {
        (CreatorType::Tool, raw)
    };
    let rest = rest.trim();

    let (name, email) = match (rest.rfind('('), rest.ends_with(')')) {
        (Some(open), true) => {
            let email = rest[open + 1..rest.len() - 1].trim();
            (
                rest[..open].trim().to_string(),
                (!email.is_empty()).then(|| email.to_string()),
            )
        }
        _ => (rest.to_string(), None),
    };
    Some((creator_type, name, email))
}

fn parse_creator(raw: &str) -> Option<Creator> {
    let (creator_type, name, email) = parse_actor(raw)?;
    let mut creator = Creator::new(creator_type, name);
    creator.email = email;
    Some(creator)
}

fn parse_organization(raw: &str) -> Option<Organization> {
    let (_, name, email) = parse_actor(raw)?;
    let mut org = Organization::new(name);
    if email.is_some() {
        org.contacts.push(Contact {
            name: None,
            email,
            phone: None,
        });
    }
    Some(org)
}

/// Which block of a tag-value document the current line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagSection {
    Document,
    Package,
    /// Files, snippets and extracted licenses, which are not read
    Other,
}

/// Read tag-value content into the JSON deserialization structs.
fn parse_tag_value_format(content: &str) -> Result<SpdxDocument, ParseError> {
    let mut doc = SpdxDocument::default();
    let mut creation_info = SpdxCreationInfo::default();
    let mut current_package: Option<SpdxPackage> = None;
    let mut section = TagSection::Document;

    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let mut value = value.trim().to_string();

        // <text>...</text> values may span several lines.
        if value.starts_with("<text>") {
            while !value.contains("</text>") {
                match lines.next() {
                    Some(next) => {
                        value.push('\n');
                        value.push_str(next);
                    }
                    None => {
                        return Err(ParseError::InvalidStructure(format!(
                            "unterminated <text> block for {key}"
                        )))
                    }
                }
            }
            value = value
                .trim_start_matches("<text>")
                .trim_end()
                .trim_end_matches("</text>")
                .trim()
                .to_string();
        }

        match key {
            "PackageName" => {
                doc.packages.extend(current_package.take());
                current_package = Some(SpdxPackage {
                    name: value,
                    ..Default::default()
                });
                section = TagSection::Package;
                continue;
            }
            "FileName" | "SnippetSPDXID" | "LicenseID" => {
                doc.packages.extend(current_package.take());
                section = TagSection::Other;
                continue;
            }
            "Relationship" => {
                let parts: Vec<&str> = value.split_whitespace().collect();
                if let [element, relationship, related, ..] = parts.as_slice() {
                    doc.relationships.push(SpdxRelationship {
                        spdx_element_id: (*element).to_string(),
                        relationship_type: (*relationship).to_string(),
                        related_spdx_element: (*related).to_string(),
                    });
                }
                continue;
            }
            _ => {}
        }

        match section {
            TagSection::Document => match key {
                "SPDXVersion" => doc.spdx_version = value,
                "SPDXID" => doc.spdx_id = value,
                "DocumentName" => doc.name = value,
                "DataLicense" => doc.data_license = value,
                "DocumentNamespace" => doc.document_namespace = Some(value),
                "DocumentComment" => doc.comment = Some(value),
                "Creator" => creation_info.creators.push(value),
                "Created" => creation_info.created = Some(value),
                "CreatorComment" => creation_info.comment = Some(value),
                "LicenseListVersion" => creation_info.license_list_version = Some(value),
                "ExternalDocumentRef" => {
                    // DocumentRef-<id> <uri> <algorithm>: <checksum>
                    if let Some(uri) = value.split_whitespace().nth(1) {
                        doc.external_document_refs.push(SpdxExternalDocRef {
                            spdx_document: uri.to_string(),
                        });
                    }
                }
                _ => {}
            },
            TagSection::Package => {
                if let Some(pkg) = current_package.as_mut() {
                    apply_package_tag(pkg, key, value);
                }
            }
            TagSection::Other => {}
        }
    }

    doc.packages.extend(current_package);
    doc.creation_info = Some(creation_info);
    Ok(doc)
}

fn apply_package_tag(pkg: &mut SpdxPackage, key: &str, value: String) {
    match key {
        "SPDXID" => pkg.spdx_id = value,
        "PackageVersion" => pkg.version_info = Some(value),
        "PackageFileName" => pkg.package_file_name = Some(value),
        "PackageSupplier" => pkg.supplier = Some(value),
        "PackageOriginator" => pkg.originator = Some(value),
        "PackageDownloadLocation" => pkg.download_location = Some(value),
        "FilesAnalyzed" => pkg.files_analyzed = Some(value.eq_ignore_ascii_case("true")),
        "PackageLicenseConcluded" => pkg.license_concluded = Some(value),
        "PackageLicenseDeclared" => pkg.license_declared = Some(value),
        "PackageCopyrightText" => pkg.copyright_text = Some(value),
        "PackageDescription" => pkg.description = Some(value),
        "PrimaryPackagePurpose" => pkg.primary_package_purpose = Some(value),
        "PackageChecksum" => {
            if let Some((algorithm, checksum)) = value.split_once(':') {
                pkg.checksums.push(SpdxChecksum {
                    algorithm: algorithm.trim().to_string(),
                    checksum_value: checksum.trim().to_string(),
                });
            }
        }
        "ExternalRef" => {
            let parts: Vec<&str> = value.split_whitespace().collect();
            if let [category, reference_type, locator, ..] = parts.as_slice() {
                pkg.external_refs.push(SpdxExternalRef {
                    reference_category: (*category).to_string(),
                    reference_type: (*reference_type).to_string(),
                    reference_locator: (*locator).to_string(),
                });
            }
        }
        _ => {}
    }
}

// SPDX JSON structures for deserialization

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument {
    #[serde(default)]
    spdx_version: String,
    #[serde(rename = "SPDXID", default)]
    spdx_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    data_license: String,
    document_namespace: Option<String>,
    comment: Option<String>,
    creation_info: Option<SpdxCreationInfo>,
    #[serde(default)]
    document_describes: Vec<String>,
    #[serde(default)]
    packages: Vec<SpdxPackage>,
    #[serde(default)]
    relationships: Vec<SpdxRelationship>,
    #[serde(default)]
    external_document_refs: Vec<SpdxExternalDocRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxCreationInfo {
    created: Option<String>,
    #[serde(default)]
    creators: Vec<String>,
    license_list_version: Option<String>,
    comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage {
    #[serde(rename = "SPDXID", default)]
    spdx_id: String,
    name: String,
    version_info: Option<String>,
    package_file_name: Option<String>,
    download_location: Option<String>,
    files_analyzed: Option<bool>,
    license_concluded: Option<String>,
    license_declared: Option<String>,
    copyright_text: Option<String>,
    supplier: Option<String>,
    originator: Option<String>,
    primary_package_purpose: Option<String>,
    #[serde(default)]
    checksums: Vec<SpdxChecksum>,
    #[serde(default)]
    external_refs: Vec<SpdxExternalRef>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxChecksum {
    algorithm: String,
    checksum_value: String,
}

/// `PACKAGE-MANAGER` in 2.3, `PACKAGE_MANAGER` in some 2.2 JSON producers.
fn is_package_manager(category: &str) -> bool {
    category.trim().replace('_', "-").eq_ignore_ascii_case("PACKAGE-MANAGER")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalRef {
    reference_category: String,
    reference_type: String,
    reference_locator: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxRelationship {
    spdx_element_id: String,
    relationship_type: String,
    related_spdx_element: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalDocRef {
    spdx_document: String,
}
