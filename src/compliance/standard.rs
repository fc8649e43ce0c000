//! The strategy every standard implements, and the evaluation pipeline that
//! runs one.

use super::check::Check;
use super::context::RunContext;
use super::record::CheckKey;
use super::report::{ComplianceReport, StandardDescriptor};
use super::section::{build_sections, validate_metadata, SectionMeta};
use super::store::RecordStore;
use crate::error::Result;
use crate::model::NormalizedSbom;
use std::collections::HashMap;

/// A compliance standard: its checks and the metadata describing each key.
pub trait Standard {
    type Key: CheckKey;

    fn descriptor(&self) -> StandardDescriptor;

    fn checks(&self) -> Vec<Check<Self::Key>>;

    fn metadata(&self) -> HashMap<Self::Key, SectionMeta>;
}

/// Evaluate a document against a standard.
///
/// Metadata completeness is verified before any check runs. All records of a
/// run go into one fresh store which is dropped once the report is built.
pub fn evaluate<S: Standard>(standard: &S, sbom: &NormalizedSbom) -> Result<ComplianceReport> {
    let descriptor = standard.descriptor();
    let metadata = standard.metadata();
    validate_metadata(&metadata, descriptor.short_name)?;

    let ctx = RunContext::new(sbom);
    let mut store = RecordStore::new();
    for check in standard.checks() {
        store.add_all(check.run(sbom, &ctx));
    }
    tracing::debug!(
        standard = descriptor.short_name,
        records = store.len(),
        elements = store.all_ids().len(),
        "Checks completed"
    );

    let sections = build_sections(&store, &metadata, descriptor.short_name)?;
    let summary = store.score_of_document().into();

    Ok(ComplianceReport {
        descriptor,
        summary,
        sections,
    })
}
