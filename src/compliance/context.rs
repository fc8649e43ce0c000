//! Per-run lookups shared by every check.

use super::record::RESERVED_IDS;
use crate::model::{CanonicalId, Component, NormalizedSbom};
use std::collections::{HashMap, HashSet};

/// Derived, read-only facts about one document, computed once per run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    element_ids: HashMap<CanonicalId, String>,
    primary_dependencies: HashSet<CanonicalId>,
    dependents: HashSet<CanonicalId>,
    dependency_names: HashMap<CanonicalId, Vec<String>>,
}

impl RunContext {
    #[must_use]
    pub fn new(sbom: &NormalizedSbom) -> Self {
        let element_ids = derive_element_ids(sbom);

        let primary_dependencies: HashSet<CanonicalId> = sbom
            .primary_component_id
            .as_ref()
            .map(|primary| {
                sbom.get_dependencies(primary)
                    .into_iter()
                    .map(|edge| edge.to.clone())
                    .collect()
            })
            .unwrap_or_default();

        let mut dependency_names: HashMap<CanonicalId, Vec<String>> = HashMap::new();
        let mut dependents = HashSet::new();
        for edge in sbom.edges.iter().filter(|e| e.is_dependency()) {
            dependents.insert(edge.to.clone());
            let name = sbom
                .get_component(&edge.to)
                .map_or_else(|| edge.to.value().to_string(), Component::display_name);
            dependency_names
                .entry(edge.from.clone())
                .or_default()
                .push(name);
        }

        tracing::debug!(
            elements = element_ids.len(),
            primary_dependencies = primary_dependencies.len(),
            "Built run context"
        );

        Self {
            element_ids,
            primary_dependencies,
            dependents,
            dependency_names,
        }
    }

    /// Unique element id of a component.
    #[must_use]
    pub fn element_id<'a>(&'a self, component: &'a Component) -> &'a str {
        self.element_ids
            .get(&component.canonical_id)
            .map_or(component.canonical_id.value(), String::as_str)
    }

    /// Whether the component is a direct dependency of the primary component.
    #[must_use]
    pub fn is_primary_dependency(&self, id: &CanonicalId) -> bool {
        self.primary_dependencies.contains(id)
    }

    #[must_use]
    pub fn primary_dependency_count(&self) -> usize {
        self.primary_dependencies.len()
    }

    /// Whether any component depends on this one.
    #[must_use]
    pub fn is_depended_upon(&self, id: &CanonicalId) -> bool {
        self.dependents.contains(id)
    }

    /// Display names of a component's direct dependencies.
    #[must_use]
    pub fn dependencies_of(&self, id: &CanonicalId) -> &[String] {
        self.dependency_names
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// `name@version` per component, suffixed with the document reference when
/// that label is ambiguous or reserved.
fn derive_element_ids(sbom: &NormalizedSbom) -> HashMap<CanonicalId, String> {
    let mut label_counts: HashMap<String, usize> = HashMap::new();
    for comp in sbom.components.values() {
        *label_counts.entry(base_label(comp)).or_default() += 1;
    }

    sbom.components
        .values()
        .map(|comp| {
            let label = base_label(comp);
            let ambiguous = RESERVED_IDS.contains(&label.as_str())
                || label_counts.get(&label).copied().unwrap_or(0) > 1;
            let id = if ambiguous {
                format!("{label}#{}", comp.identifiers.format_id)
            } else {
                label
            };
            (comp.canonical_id.clone(), id)
        })
        .collect()
}

fn base_label(comp: &Component) -> String {
    if comp.name.trim().is_empty() {
        comp.identifiers.format_id.clone()
    } else {
        comp.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DependencyEdge, DependencyType};

    fn sbom() -> NormalizedSbom {
        let mut sbom = NormalizedSbom::default();
        sbom.add_component(Component::new("app".into(), "root".into()).with_version("1.0".into()));
        sbom.add_component(Component::new("lib".into(), "lib-1".into()).with_version("2.0".into()));
        sbom.add_component(Component::new("lib".into(), "lib-2".into()).with_version("2.0".into()));
        sbom.add_component(Component::new("doc".into(), "weird".into()));
        sbom.set_primary_component(CanonicalId::from_format_id("root"));
        sbom.add_edge(DependencyEdge::new(
            CanonicalId::from_format_id("root"),
            CanonicalId::from_format_id("lib-1"),
            DependencyType::DependsOn,
        ));
        sbom.add_edge(DependencyEdge::new(
            CanonicalId::from_format_id("lib-1"),
            CanonicalId::from_format_id("lib-2"),
            DependencyType::DependsOn,
        ));
        sbom
    }

    #[test]
    fn test_element_ids_are_unique() {
        let sbom = sbom();
        let ctx = RunContext::new(&sbom);
        let ids: Vec<&str> = sbom.components.values().map(|c| ctx.element_id(c)).collect();
        assert_eq!(ids, vec!["app@1.0", "lib@2.0#lib-1", "lib@2.0#lib-2", "doc#weird"]);
    }

    #[test]
    fn test_document_label_is_never_a_component_id() {
        let mut sbom = NormalizedSbom::default();
        sbom.add_component(Component::new("SBOM Level".into(), "imposter".into()));
        let ctx = RunContext::new(&sbom);
        let comp = sbom.components.values().next().unwrap();
        assert_eq!(ctx.element_id(comp), "SBOM Level#imposter");
    }

    #[test]
    fn test_primary_dependencies_are_direct_only() {
        let ctx = RunContext::new(&sbom());
        assert!(ctx.is_primary_dependency(&CanonicalId::from_format_id("lib-1")));
        assert!(!ctx.is_primary_dependency(&CanonicalId::from_format_id("lib-2")));
        assert_eq!(ctx.primary_dependency_count(), 1);
    }

    #[test]
    fn test_dependency_names() {
        let ctx = RunContext::new(&sbom());
        assert_eq!(
            ctx.dependencies_of(&CanonicalId::from_format_id("root")),
            ["lib@2.0".to_string()]
        );
        assert!(ctx
            .dependencies_of(&CanonicalId::from_format_id("lib-2"))
            .is_empty());
        assert!(ctx.is_depended_upon(&CanonicalId::from_format_id("lib-2")));
        assert!(!ctx.is_depended_upon(&CanonicalId::from_format_id("root")));
    }
}
