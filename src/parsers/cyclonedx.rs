//! CycloneDX SBOM parser.
//!
//! Reads CycloneDX JSON (1.2 through 1.6). Nested components are flattened
//! into the document's component list; the `metadata.component` becomes the
//! primary component.

use crate::model::{
    CanonicalId, CompletenessDeclaration, Component, ComponentType, Contact, Creator, CreatorType,
    DependencyEdge, DependencyType, DocumentMetadata, ExternalRefType, ExternalReference,
    FileFormat, Hash, HashAlgorithm, LicenseExpression, NormalizedSbom, Organization, Property,
    SbomFormat,
};
use crate::parsers::traits::{
    parse_timestamp, sniff_json_string, FormatConfidence, FormatDetection, ParseError, SbomParser,
};
use serde::Deserialize;
use std::collections::HashMap;

/// Property names BSI TR-03183-2 uses to carry the artifact file name.
const FILENAME_PROPERTIES: &[&str] = &["bsi:component:filename", "filename"];

/// Parser for CycloneDX SBOM format
#[derive(Debug, Default)]
pub struct CycloneDxParser;

impl CycloneDxParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parse_json(&self, content: &str) -> Result<NormalizedSbom, ParseError> {
        let cdx: CycloneDxBom =
            serde_json::from_str(content).map_err(|e| ParseError::JsonError(e.to_string()))?;
        self.convert_to_normalized(cdx)
    }

    fn convert_to_normalized(&self, cdx: CycloneDxBom) -> Result<NormalizedSbom, ParseError> {
        let document = self.convert_metadata(&cdx);
        let mut sbom = NormalizedSbom::new(document);
        let mut id_map: HashMap<String, CanonicalId> = HashMap::new();

        if let Some(meta_comp) = cdx.metadata.as_ref().and_then(|m| m.component.as_ref()) {
            let comp = self.convert_component(meta_comp);
            let canonical_id = comp.canonical_id.clone();
            id_map.insert(comp.identifiers.format_id.clone(), canonical_id.clone());
            sbom.set_primary_component(canonical_id);
            sbom.add_component(comp);
            // Sub-components of the product are part of the inventory too.
            if let Some(children) = &meta_comp.components {
                self.add_components(&mut sbom, &mut id_map, children);
            }
        }

        if let Some(components) = &cdx.components {
            self.add_components(&mut sbom, &mut id_map, components);
        }

        for dep in cdx.dependencies.iter().flatten() {
            let Some(from_id) = id_map.get(&dep.ref_field) else {
                tracing::debug!(bom_ref = %dep.ref_field, "Dependency refers to unknown component");
                continue;
            };
            for depends_on in dep.depends_on.iter().flatten() {
                if let Some(to_id) = id_map.get(depends_on) {
                    sbom.add_edge(DependencyEdge::new(
                        from_id.clone(),
                        to_id.clone(),
                        DependencyType::DependsOn,
                    ));
                }
            }
        }

        sbom.vulnerabilities = cdx
            .vulnerabilities
            .iter()
            .flatten()
            .map(|v| v.id.clone())
            .collect();

        sbom.log_collision_summary();
        sbom.calculate_content_hash();
        Ok(sbom)
    }

    /// Add components depth-first, flattening `components[].components[]`.
    fn add_components(
        &self,
        sbom: &mut NormalizedSbom,
        id_map: &mut HashMap<String, CanonicalId>,
        components: &[CdxComponent],
    ) {
        for cdx_comp in components {
            let comp = self.convert_component(cdx_comp);
            id_map.insert(comp.identifiers.format_id.clone(), comp.canonical_id.clone());
            sbom.add_component(comp);
            if let Some(children) = &cdx_comp.components {
                self.add_components(sbom, id_map, children);
            }
        }
    }

    fn convert_metadata(&self, cdx: &CycloneDxBom) -> DocumentMetadata {
        let meta = cdx.metadata.as_ref();

        let mut creators = Vec::new();
        for tool in meta.and_then(|m| m.tools.as_ref()).into_iter().flatten() {
            let name = format!(
                "{} {}",
                tool.name.as_deref().unwrap_or("unknown"),
                tool.version.as_deref().unwrap_or("")
            );
            creators.push(Creator::new(CreatorType::Tool, name.trim()));
        }
        for author in meta.and_then(|m| m.authors.as_ref()).into_iter().flatten() {
            let mut creator = Creator::new(
                CreatorType::Person,
                author.name.clone().unwrap_or_default(),
            );
            creator.email = author.email.clone();
            if !creator.name.is_empty() || creator.email.is_some() {
                creators.push(creator);
            }
        }

        let manufacturer = meta
            .and_then(|m| m.manufacturer.as_ref().or(m.manufacture.as_ref()))
            .map(CdxOrganization::to_model);
        if let Some(org) = &manufacturer {
            let mut creator = Creator::new(CreatorType::Organization, org.name.clone());
            creator.email = org.contacts.iter().find_map(|c| c.email.clone());
            creator.url = org.urls.first().cloned();
            creators.push(creator);
        }

        let lifecycles = meta
            .and_then(|m| m.lifecycles.as_ref())
            .into_iter()
            .flatten()
            .filter_map(|l| l.phase.clone().or_else(|| l.name.clone()))
            .collect();

        let bom_links = cdx
            .external_references
            .iter()
            .flatten()
            .filter(|r| ExternalRefType::parse(&r.ref_type) == ExternalRefType::Bom)
            .map(|r| r.url.clone())
            .collect();

        let completeness = cdx
            .compositions
            .iter()
            .flatten()
            .find_map(|c| c.aggregate.as_deref())
            .map_or(CompletenessDeclaration::NotSpecified, |a| {
                CompletenessDeclaration::from_aggregate(a)
            });

        DocumentMetadata {
            format: SbomFormat::CycloneDx,
            file_format: FileFormat::Json,
            spec_version: cdx.spec_version.clone(),
            serial_number: cdx.serial_number.clone(),
            spdx_id: None,
            name: meta.and_then(|m| m.component.as_ref()).map(|c| c.name.clone()),
            data_license: None,
            license_list_version: None,
            comment: None,
            created: parse_timestamp(meta.and_then(|m| m.timestamp.as_deref())),
            creators,
            supplier: meta
                .and_then(|m| m.supplier.as_ref())
                .map(CdxOrganization::to_model),
            manufacturer,
            lifecycles,
            has_signature: cdx.signature.as_ref().is_some_and(|s| !s.is_null()),
            completeness,
            bom_links,
        }
    }

    fn convert_component(&self, cdx: &CdxComponent) -> Component {
        let format_id = cdx.bom_ref.clone().unwrap_or_else(|| match &cdx.version {
            Some(v) => format!("{}@{}", cdx.name, v),
            None => cdx.name.clone(),
        });
        let mut comp = Component::new(cdx.name.clone(), format_id);

        if let Some(version) = &cdx.version {
            comp = comp.with_version(version.clone());
        }
        if let Some(purl) = &cdx.purl {
            comp = comp.with_purl(purl.clone());
        }
        if let Some(component_type) = &cdx.component_type {
            comp.component_type = ComponentType::parse(component_type);
        }
        if let Some(cpe) = &cdx.cpe {
            comp.identifiers.cpe.push(cpe.clone());
        }
        comp.identifiers.swid = cdx.swid.as_ref().and_then(|s| s.tag_id.clone());

        for lic in cdx.licenses.iter().flatten() {
            let (expr, acknowledgement) = match (&lic.license, &lic.expression) {
                (Some(license), _) => (
                    license
                        .id
                        .clone()
                        .or_else(|| license.name.clone())
                        .unwrap_or_else(|| "NOASSERTION".to_string()),
                    license.acknowledgement.as_deref(),
                ),
                (None, Some(expr)) => (expr.clone(), lic.acknowledgement.as_deref()),
                (None, None) => continue,
            };
            let expression = LicenseExpression::new(expr);
            if acknowledgement == Some("concluded") {
                comp.licenses.concluded = Some(expression);
            } else {
                comp.licenses.add_declared(expression);
            }
        }

        comp.supplier = cdx.supplier.as_ref().map(CdxOrganization::to_model);

        for h in cdx.hashes.iter().flatten() {
            comp.hashes
                .push(Hash::new(HashAlgorithm::parse(&h.alg), h.content.clone()));
        }

        for ext_ref in cdx.external_references.iter().flatten() {
            let mut reference =
                ExternalReference::new(ExternalRefType::parse(&ext_ref.ref_type), ext_ref.url.clone());
            reference.comment.clone_from(&ext_ref.comment);
            reference.hashes = ext_ref
                .hashes
                .iter()
                .flatten()
                .map(|h| Hash::new(HashAlgorithm::parse(&h.alg), h.content.clone()))
                .collect();
            comp.external_refs.push(reference);
        }

        comp.properties = cdx
            .properties
            .iter()
            .flatten()
            .map(|p| Property {
                name: p.name.clone(),
                value: p.value.clone(),
            })
            .collect();
        comp.filename = FILENAME_PROPERTIES
            .iter()
            .find_map(|name| comp.property(name))
            .map(str::to_string);

        comp.author = cdx.author.clone().or_else(|| {
            let names: Vec<&str> = cdx
                .authors
                .iter()
                .flatten()
                .filter_map(|a| a.name.as_deref())
                .collect();
            (!names.is_empty()).then(|| names.join(", "))
        });
        comp.description.clone_from(&cdx.description);
        comp.copyright.clone_from(&cdx.copyright);

        comp.calculate_content_hash();
        comp
    }
}

impl SbomParser for CycloneDxParser {
    fn parse_str(&self, content: &str) -> Result<NormalizedSbom, ParseError> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') {
            self.parse_json(content)
        } else if trimmed.starts_with('<') {
            Err(ParseError::UnknownFormat(
                "CycloneDX XML is not supported; convert the document to JSON".to_string(),
            ))
        } else {
            Err(ParseError::UnknownFormat(
                "Expected JSON CycloneDX format".to_string(),
            ))
        }
    }

    fn supported_versions(&self) -> Vec<&str> {
        vec!["1.2", "1.3", "1.4", "1.5", "1.6"]
    }

    fn format_name(&self) -> &str {
        "CycloneDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let trimmed = content.trim_start();
        if !trimmed.starts_with('{') {
            return FormatDetection::no_match();
        }

        let has_bom_format = content.contains("\"bomFormat\"");
        let has_cyclonedx = content.contains("CycloneDX") || content.contains("cyclonedx");
        let has_spec_version = content.contains("\"specVersion\"");
        let version = sniff_json_string(content, "specVersion");

        let mut detection = if has_bom_format && has_cyclonedx {
            FormatDetection::with_confidence(FormatConfidence::CERTAIN).variant("JSON")
        } else if has_bom_format {
            FormatDetection::with_confidence(FormatConfidence::HIGH).variant("JSON")
        } else if has_spec_version && content.contains("\"components\"") {
            FormatDetection::with_confidence(FormatConfidence::MEDIUM)
                .variant("JSON")
                .warning("Missing bomFormat field - might not be CycloneDX")
        } else {
            return FormatDetection::no_match();
        };

        if let Some(v) = version {
            if !self.supported_versions().contains(&v.as_str()) {
                detection = detection.warning(&format!("Untested CycloneDX version {v}"));
            }
            detection = detection.version(&v);
        }
        detection
    }
}

// CycloneDX JSON structures for deserialization

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxBom {
    spec_version: String,
    serial_number: Option<String>,
    metadata: Option<CdxMetadata>,
    components: Option<Vec<CdxComponent>>,
    dependencies: Option<Vec<CdxDependency>>,
    vulnerabilities: Option<Vec<CdxVulnerability>>,
    compositions: Option<Vec<CdxComposition>>,
    external_references: Option<Vec<CdxExternalReference>>,
    signature: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxMetadata {
    timestamp: Option<String>,
    /// Array in 1.4/1.5, object with components/services in 1.6
    #[serde(default, deserialize_with = "deserialize_tools")]
    tools: Option<Vec<CdxTool>>,
    authors: Option<Vec<CdxContact>>,
    component: Option<CdxComponent>,
    /// 1.5 spelling
    manufacture: Option<CdxOrganization>,
    /// 1.6 spelling
    manufacturer: Option<CdxOrganization>,
    supplier: Option<CdxOrganization>,
    lifecycles: Option<Vec<CdxLifecycle>>,
}

#[derive(Debug, Deserialize)]
struct CdxLifecycle {
    /// design, pre-build, build, post-build, operations, discovery, decommission
    phase: Option<String>,
    /// Custom phase name
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxToolsObject {
    components: Option<Vec<CdxTool>>,
    services: Option<Vec<CdxTool>>,
}

#[derive(Debug, Deserialize)]
struct CdxTool {
    name: Option<String>,
    version: Option<String>,
}

fn deserialize_tools<'de, D>(deserializer: D) -> Result<Option<Vec<CdxTool>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ToolsVisitor;

    impl<'de> Visitor<'de> for ToolsVisitor {
        type Value = Option<Vec<CdxTool>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an array of tools or an object with components/services")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut tools = Vec::new();
            while let Some(tool) = seq.next_element::<CdxTool>()? {
                tools.push(tool);
            }
            Ok(Some(tools))
        }

        fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let tools_obj: CdxToolsObject =
                Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;
            let tools: Vec<CdxTool> = tools_obj
                .components
                .into_iter()
                .flatten()
                .chain(tools_obj.services.into_iter().flatten())
                .collect();
            Ok(if tools.is_empty() { None } else { Some(tools) })
        }
    }

    deserializer.deserialize_any(ToolsVisitor)
}

#[derive(Debug, Deserialize)]
struct CdxContact {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxOrganization {
    name: Option<String>,
    url: Option<Vec<String>>,
    contact: Option<Vec<CdxContact>>,
}

impl CdxOrganization {
    fn to_model(&self) -> Organization {
        let mut org = Organization::new(self.name.clone().unwrap_or_default());
        org.urls = self.url.clone().unwrap_or_default();
        org.contacts = self
            .contact
            .iter()
            .flatten()
            .map(|c| Contact {
                name: c.name.clone(),
                email: c.email.clone(),
                phone: c.phone.clone(),
            })
            .collect();
        org
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxComponent {
    #[serde(rename = "type")]
    component_type: Option<String>,
    #[serde(rename = "bom-ref")]
    bom_ref: Option<String>,
    name: String,
    version: Option<String>,
    purl: Option<String>,
    cpe: Option<String>,
    swid: Option<CdxSwid>,
    description: Option<String>,
    author: Option<String>,
    authors: Option<Vec<CdxContact>>,
    copyright: Option<String>,
    licenses: Option<Vec<CdxLicenseChoice>>,
    supplier: Option<CdxOrganization>,
    hashes: Option<Vec<CdxHash>>,
    external_references: Option<Vec<CdxExternalReference>>,
    properties: Option<Vec<CdxProperty>>,
    components: Option<Vec<CdxComponent>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxSwid {
    tag_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxLicenseChoice {
    license: Option<CdxLicense>,
    expression: Option<String>,
    acknowledgement: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxLicense {
    id: Option<String>,
    name: Option<String>,
    acknowledgement: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxHash {
    alg: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CdxExternalReference {
    #[serde(rename = "type")]
    ref_type: String,
    url: String,
    comment: Option<String>,
    hashes: Option<Vec<CdxHash>>,
}

#[derive(Debug, Deserialize)]
struct CdxProperty {
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxDependency {
    #[serde(rename = "ref")]
    ref_field: String,
    depends_on: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CdxVulnerability {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CdxComposition {
    aggregate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.6",
        "serialNumber": "urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79",
        "metadata": {
            "timestamp": "2024-05-01T12:00:00Z",
            "lifecycles": [{"phase": "build"}],
            "tools": {"components": [{"name": "syft", "version": "1.0"}]},
            "authors": [{"name": "Jane Doe", "email": "jane@example.com"}],
            "manufacturer": {"name": "Acme", "url": ["https://acme.example"]},
            "component": {"type": "application", "bom-ref": "app", "name": "app", "version": "2.0"}
        },
        "components": [
            {
                "type": "library",
                "bom-ref": "lib-a",
                "name": "lib-a",
                "version": "1.0.0",
                "purl": "pkg:npm/lib-a@1.0.0",
                "licenses": [
                    {"license": {"id": "MIT"}},
                    {"expression": "Apache-2.0", "acknowledgement": "concluded"}
                ],
                "hashes": [{"alg": "SHA-256", "content": "abc"}],
                "properties": [{"name": "bsi:component:filename", "value": "lib-a.tgz"}],
                "components": [{"type": "library", "bom-ref": "lib-a-inner", "name": "inner"}]
            }
        ],
        "dependencies": [
            {"ref": "app", "dependsOn": ["lib-a"]},
            {"ref": "lib-a", "dependsOn": ["lib-a-inner"]}
        ],
        "compositions": [{"aggregate": "complete"}],
        "vulnerabilities": [{"id": "CVE-2024-0001"}],
        "externalReferences": [{"type": "bom", "url": "urn:cdx:other/1"}]
    }"#;

    #[test]
    fn test_parse_metadata() {
        let sbom = CycloneDxParser::new().parse_str(SAMPLE).expect("parse");
        let doc = &sbom.document;
        assert_eq!(doc.spec_version, "1.6");
        assert!(doc.created.is_some());
        assert_eq!(doc.lifecycles, vec!["build".to_string()]);
        assert_eq!(doc.creators_of(CreatorType::Tool).count(), 1);
        assert_eq!(doc.manufacturer.as_ref().map(|m| m.name.as_str()), Some("Acme"));
        assert_eq!(doc.completeness, CompletenessDeclaration::Complete);
        assert_eq!(doc.bom_links.len(), 1);
        assert_eq!(sbom.vulnerabilities, vec!["CVE-2024-0001".to_string()]);
    }

    #[test]
    fn test_parse_components_and_edges() {
        let sbom = CycloneDxParser::new().parse_str(SAMPLE).expect("parse");
        assert_eq!(sbom.component_count(), 3);
        assert_eq!(sbom.primary_component().map(|c| c.name.as_str()), Some("app"));

        let lib = sbom
            .get_component(&CanonicalId::from_format_id("lib-a"))
            .expect("lib-a");
        assert_eq!(lib.licenses.declared.len(), 1);
        assert_eq!(
            lib.licenses.concluded.as_ref().map(|l| l.expression.as_str()),
            Some("Apache-2.0")
        );
        assert_eq!(lib.filename.as_deref(), Some("lib-a.tgz"));
        assert_eq!(lib.hashes[0].algorithm, HashAlgorithm::Sha256);
        assert_eq!(sbom.edges.len(), 2);
    }

    #[test]
    fn test_tools_array_form() {
        let content = r#"{"bomFormat":"CycloneDX","specVersion":"1.4",
            "metadata":{"tools":[{"vendor":"x","name":"cdxgen","version":"9"}]}}"#;
        let sbom = CycloneDxParser::new().parse_str(content).expect("parse");
        assert_eq!(sbom.document.creators[0].name, "cdxgen 9");
        assert!(sbom.document.created.is_none());
    }

    #[test]
    fn test_xml_is_rejected() {
        let err = CycloneDxParser::new()
            .parse_str("<bom xmlns=\"http://cyclonedx.org/schema/bom/1.5\"/>")
            .unwrap_err();
        assert!(matches!(err, ParseError::UnknownFormat(_)));
    }
}
