//! Joins stored records with a standard's static metadata into an ordered
//! list of report rows.

use super::record::{CheckKey, Maturity, Record, DOC_ID};
use super::store::RecordStore;
use crate::error::{Result, SbomComplianceError};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Display label of the document element.
pub const DOC_LABEL: &str = "SBOM Level";

/// Static description of one check key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMeta {
    pub title: &'static str,
    pub clause_id: &'static str,
    pub required: bool,
    pub data_field: &'static str,
}

impl SectionMeta {
    #[must_use]
    pub const fn new(
        title: &'static str,
        clause_id: &'static str,
        required: bool,
        data_field: &'static str,
    ) -> Self {
        Self {
            title,
            clause_id,
            required,
            data_field,
        }
    }
}

/// One report row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub section_title: String,
    pub section_id: String,
    pub section_data_field: String,
    pub required: bool,
    pub element_id: String,
    pub element_result: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity: Option<Maturity>,
}

/// Fail if any key the standard declares has no metadata entry.
pub fn validate_metadata<K: CheckKey>(
    metadata: &HashMap<K, SectionMeta>,
    standard: &str,
) -> Result<()> {
    match K::all().iter().find(|key| !metadata.contains_key(key)) {
        Some(key) => Err(SbomComplianceError::missing_section_metadata(
            standard,
            key.name(),
        )),
        None => Ok(()),
    }
}

/// Build the ordered section list for a populated store.
///
/// The document group comes first, then every other element in lexicographic
/// label order. Inside a group rows are ordered by clause id (dotted numeric
/// comparison), then check key, then result text.
pub fn build_sections<K: CheckKey>(
    store: &RecordStore<K>,
    metadata: &HashMap<K, SectionMeta>,
    standard: &str,
) -> Result<Vec<Section>> {
    let mut doc_group: Vec<(K, Section)> = Vec::new();
    let mut groups: BTreeMap<String, Vec<(K, Section)>> = BTreeMap::new();

    for id in store.all_ids() {
        for record in store.by_id(id) {
            let section = build_section(store, metadata, record, standard)?;
            if id == DOC_ID {
                doc_group.push((record.check_key(), section));
            } else {
                groups
                    .entry(section.element_id.clone())
                    .or_default()
                    .push((record.check_key(), section));
            }
        }
    }

    let mut sections = Vec::with_capacity(store.len());
    for mut group in std::iter::once(doc_group).chain(groups.into_values()) {
        group.sort_by(|(ka, a), (kb, b)| compare_rows(*ka, a, *kb, b));
        sections.extend(group.into_iter().map(|(_, s)| s));
    }
    Ok(sections)
}

fn build_section<K: CheckKey>(
    store: &RecordStore<K>,
    metadata: &HashMap<K, SectionMeta>,
    record: &Record<K>,
    standard: &str,
) -> Result<Section> {
    let key = record.check_key();
    let meta = metadata
        .get(&key)
        .ok_or_else(|| SbomComplianceError::missing_section_metadata(standard, key.name()))?;

    let element_id = if record.id() == DOC_ID {
        DOC_LABEL.to_string()
    } else {
        record.id().to_string()
    };

    Ok(Section {
        section_title: meta.title.to_string(),
        section_id: meta.clause_id.to_string(),
        section_data_field: meta.data_field.to_string(),
        required: meta.required,
        element_id,
        element_result: record.check_value().to_string(),
        score: store.score_of_attribute(key, record.id()),
        maturity: record.maturity(),
    })
}

fn compare_rows<K: CheckKey>(ka: K, a: &Section, kb: K, b: &Section) -> Ordering {
    compare_clause_ids(&a.section_id, &b.section_id)
        .then_with(|| ka.cmp(&kb))
        .then_with(|| a.element_result.cmp(&b.element_result))
        .then_with(|| a.maturity.cmp(&b.maturity))
}

/// Compare dotted clause ids segment by segment, numerically where both
/// segments are numbers. `"2.10"` sorts after `"2.9"`.
#[must_use]
pub fn compare_clause_ids(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(nx), Ok(ny)) => nx.cmp(&ny),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
