//! Core SBOM and Component data structures.

use super::{
    CanonicalId, ComponentIdentifiers, ComponentType, DependencyType, DocumentMetadata,
    ExternalRefType, ExternalReference, Hash, LicenseInfo, Organization, Property,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Normalized SBOM document.
///
/// Both CycloneDX and SPDX documents are read into this shape before any
/// standard is evaluated, so checks never see format-specific structures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedSbom {
    /// Document-level metadata
    pub document: DocumentMetadata,
    /// Components in document order, keyed by their document-local reference
    pub components: IndexMap<CanonicalId, Component>,
    /// Dependency edges
    pub edges: Vec<DependencyEdge>,
    /// Identifiers of vulnerabilities embedded in the document
    pub vulnerabilities: Vec<String>,
    /// Content hash for quick equality checks
    pub content_hash: u64,
    /// Product this SBOM describes (`metadata.component` / `documentDescribes`)
    pub primary_component_id: Option<CanonicalId>,
    /// Number of reference collisions encountered during parsing
    #[serde(skip)]
    pub collision_count: usize,
}

impl NormalizedSbom {
    #[must_use]
    pub fn new(document: DocumentMetadata) -> Self {
        Self {
            document,
            components: IndexMap::new(),
            edges: Vec::new(),
            vulnerabilities: Vec::new(),
            content_hash: 0,
            primary_component_id: None,
            collision_count: 0,
        }
    }

    /// Add a component to the SBOM.
    ///
    /// Returns `true` if a component with the same reference was already
    /// present and has been replaced.
    pub fn add_component(&mut self, component: Component) -> bool {
        let id = component.canonical_id.clone();
        let collided = self.components.insert(id, component).is_some();
        if collided {
            self.collision_count += 1;
        }
        collided
    }

    /// Log a single summary line if any reference collisions occurred.
    pub fn log_collision_summary(&self) {
        if self.collision_count > 0 {
            tracing::warn!(
                collision_count = self.collision_count,
                "{} components shared a reference with an earlier component and replaced it",
                self.collision_count
            );
        }
    }

    pub fn add_edge(&mut self, edge: DependencyEdge) {
        self.edges.push(edge);
    }

    #[must_use]
    pub fn get_component(&self, id: &CanonicalId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Outgoing dependency edges of a component
    #[must_use]
    pub fn get_dependencies(&self, id: &CanonicalId) -> Vec<&DependencyEdge> {
        self.edges
            .iter()
            .filter(|e| &e.from == id && e.is_dependency())
            .collect()
    }

    /// Calculate and update the content hash
    pub fn calculate_content_hash(&mut self) {
        let mut hasher_input = Vec::new();

        if let Ok(meta_json) = serde_json::to_vec(&self.document) {
            hasher_input.extend(meta_json);
        }

        let mut component_ids: Vec<_> = self.components.keys().collect();
        component_ids.sort_by(|a, b| a.value().cmp(b.value()));
        for id in component_ids {
            if let Some(comp) = self.components.get(id) {
                hasher_input.extend(comp.content_hash.to_le_bytes());
            }
        }

        for edge in &self.edges {
            hasher_input.extend(edge.from.value().as_bytes());
            hasher_input.extend(edge.to.value().as_bytes());
        }

        self.content_hash = xxh3_64(&hasher_input);
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn primary_component(&self) -> Option<&Component> {
        self.primary_component_id
            .as_ref()
            .and_then(|id| self.components.get(id))
    }

    pub fn set_primary_component(&mut self, id: CanonicalId) {
        self.primary_component_id = Some(id);
    }
}

impl Default for NormalizedSbom {
    fn default() -> Self {
        Self::new(DocumentMetadata::default())
    }
}

/// Component in the normalized SBOM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Document-local identifier
    pub canonical_id: CanonicalId,
    /// PURL, CPE, SWID and the format's own reference
    pub identifiers: ComponentIdentifiers,
    pub name: String,
    pub version: Option<String>,
    pub component_type: ComponentType,
    pub licenses: LicenseInfo,
    /// Supplier/vendor information
    pub supplier: Option<Organization>,
    /// Author or originator
    pub author: Option<String>,
    pub hashes: Vec<Hash>,
    pub external_refs: Vec<ExternalReference>,
    pub copyright: Option<String>,
    /// SPDX `downloadLocation`
    pub download_location: Option<String>,
    /// SPDX `filesAnalyzed`, `None` for CycloneDX
    pub files_analyzed: Option<bool>,
    /// File name of the delivered artifact
    pub filename: Option<String>,
    /// CycloneDX properties
    pub properties: Vec<Property>,
    pub description: Option<String>,
    /// Content hash for quick comparison
    pub content_hash: u64,
}

impl Component {
    /// Create a new component with minimal required fields
    #[must_use]
    pub fn new(name: String, format_id: String) -> Self {
        let identifiers = ComponentIdentifiers::new(format_id);
        let canonical_id = identifiers.canonical_id();

        Self {
            canonical_id,
            identifiers,
            name,
            version: None,
            component_type: ComponentType::Library,
            licenses: LicenseInfo::default(),
            supplier: None,
            author: None,
            hashes: Vec::new(),
            external_refs: Vec::new(),
            copyright: None,
            download_location: None,
            files_analyzed: None,
            filename: None,
            properties: Vec::new(),
            description: None,
            content_hash: 0,
        }
    }

    #[must_use]
    pub fn with_purl(mut self, purl: String) -> Self {
        self.identifiers.purl = Some(purl);
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: String) -> Self {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub fn with_supplier(mut self, supplier: Organization) -> Self {
        self.supplier = Some(supplier);
        self
    }

    /// Calculate and update content hash
    pub fn calculate_content_hash(&mut self) {
        let mut hasher_input = Vec::new();

        hasher_input.extend(self.name.as_bytes());
        if let Some(v) = &self.version {
            hasher_input.extend(v.as_bytes());
        }
        if let Some(purl) = &self.identifiers.purl {
            hasher_input.extend(purl.as_bytes());
        }
        for license in self.licenses.all_licenses() {
            hasher_input.extend(license.expression.as_bytes());
        }
        if let Some(supplier) = &self.supplier {
            hasher_input.extend(supplier.name.as_bytes());
        }
        for hash in &self.hashes {
            hasher_input.extend(hash.value.as_bytes());
        }

        self.content_hash = xxh3_64(&hasher_input);
    }

    /// `name@version`, or the bare name when unversioned
    #[must_use]
    pub fn display_name(&self) -> String {
        self.version
            .as_ref()
            .map_or_else(|| self.name.clone(), |v| format!("{}@{}", self.name, v))
    }

    /// External references of one type
    pub fn refs_of(&self, ref_type: &ExternalRefType) -> impl Iterator<Item = &ExternalReference> {
        let ref_type = ref_type.clone();
        self.external_refs
            .iter()
            .filter(move |r| r.ref_type == ref_type)
    }

    /// Value of the first property with the given name (case-insensitive)
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value.as_str())
    }
}

/// Dependency edge between components
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: CanonicalId,
    pub to: CanonicalId,
    pub relationship: DependencyType,
}

impl DependencyEdge {
    #[must_use]
    pub const fn new(from: CanonicalId, to: CanonicalId, relationship: DependencyType) -> Self {
        Self {
            from,
            to,
            relationship,
        }
    }

    /// Relationships that count as "depends on" for compliance purposes.
    #[must_use]
    pub const fn is_dependency(&self) -> bool {
        matches!(
            self.relationship,
            DependencyType::DependsOn
                | DependencyType::OptionalDependsOn
                | DependencyType::DevDependsOn
                | DependencyType::BuildDependsOn
                | DependencyType::RuntimeDependsOn
                | DependencyType::Contains
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_component_counts_collisions() {
        let mut sbom = NormalizedSbom::default();
        assert!(!sbom.add_component(Component::new("a".into(), "ref-a".into())));
        assert!(sbom.add_component(Component::new("b".into(), "ref-a".into())));
        assert_eq!(sbom.collision_count, 1);
        assert_eq!(sbom.component_count(), 1);
    }

    #[test]
    fn test_dependencies_ignore_describes() {
        let mut sbom = NormalizedSbom::default();
        let a = CanonicalId::from_format_id("a");
        let b = CanonicalId::from_format_id("b");
        sbom.add_edge(DependencyEdge::new(
            a.clone(),
            b.clone(),
            DependencyType::DependsOn,
        ));
        sbom.add_edge(DependencyEdge::new(a.clone(), b, DependencyType::Describes));
        assert_eq!(sbom.get_dependencies(&a).len(), 1);
    }

    #[test]
    fn test_content_hash_changes_with_components() {
        let mut sbom = NormalizedSbom::default();
        sbom.calculate_content_hash();
        let empty = sbom.content_hash;

        let mut comp = Component::new("serde".into(), "serde".into()).with_version("1.0".into());
        comp.calculate_content_hash();
        sbom.add_component(comp);
        sbom.calculate_content_hash();
        assert_ne!(empty, sbom.content_hash);
    }
}
