//! Check functions and how they are applied to a document.

use super::context::RunContext;
use super::record::{CheckKey, Record};
use crate::model::{Component, NormalizedSbom};

pub type DocumentCheckFn<K> = fn(&NormalizedSbom, &RunContext) -> Vec<Record<K>>;
pub type ComponentCheckFn<K> = fn(&NormalizedSbom, &Component, &RunContext) -> Record<K>;

/// A pure evaluation step. Checks read the document and the run context and
/// return records; they never touch the store.
#[derive(Clone, Copy)]
pub enum Check<K> {
    /// Runs once per document
    Document(DocumentCheckFn<K>),
    /// Runs once per component
    Component(ComponentCheckFn<K>),
}

impl<K: CheckKey> Check<K> {
    pub fn run(&self, sbom: &NormalizedSbom, ctx: &RunContext) -> Vec<Record<K>> {
        match self {
            Self::Document(check) => check(sbom, ctx),
            Self::Component(check) => sbom
                .components
                .values()
                .map(|comp| check(sbom, comp, ctx))
                .collect(),
        }
    }
}

impl<K> std::fmt::Debug for Check<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document(_) => f.write_str("Check::Document"),
            Self::Component(_) => f.write_str("Check::Component"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::record::test_keys::TestKey;
    use super::*;

    fn doc_check(_: &NormalizedSbom, _: &RunContext) -> Vec<Record<TestKey>> {
        vec![Record::doc(TestKey::Alpha, "x", 10.0, true)]
    }

    fn comp_check(_: &NormalizedSbom, comp: &Component, ctx: &RunContext) -> Record<TestKey> {
        Record::new(TestKey::Beta, ctx.element_id(comp), comp.name.clone(), 10.0, true)
    }

    #[test]
    fn test_component_check_runs_per_component() {
        let mut sbom = NormalizedSbom::default();
        sbom.add_component(Component::new("a".into(), "a".into()));
        sbom.add_component(Component::new("b".into(), "b".into()));
        let ctx = RunContext::new(&sbom);

        let records = Check::Component(comp_check).run(&sbom, &ctx);
        let ids: Vec<&str> = records.iter().map(Record::id).collect();
        assert_eq!(ids, vec!["a", "b"]);

        assert_eq!(Check::Document(doc_check).run(&sbom, &ctx).len(), 1);
    }

    #[test]
    fn test_component_check_on_empty_document() {
        let sbom = NormalizedSbom::default();
        let ctx = RunContext::new(&sbom);
        assert!(Check::Component(comp_check).run(&sbom, &ctx).is_empty());
    }
}
