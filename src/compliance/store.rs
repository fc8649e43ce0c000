//! Ingest-then-query store over [`Record`]s.
//!
//! Records live once in a backing vector; three indices hold positions into
//! it so that every downstream access pattern is a hash lookup:
//!
//! - by check key, across all elements
//! - by element id, across all keys (element totals)
//! - by (element id, check key) (attribute scores)
//!
//! The key set of the by-id index doubles as the set of distinct element ids.
//! Lookups of absent keys return empty results.

use super::record::{CheckKey, Record};
use std::collections::HashMap;

/// Multi-index record store for one standard and one run.
#[derive(Debug, Clone)]
pub struct RecordStore<K: CheckKey> {
    records: Vec<Record<K>>,
    by_key: HashMap<K, Vec<usize>>,
    by_id: HashMap<String, Vec<usize>>,
    by_id_key: HashMap<String, HashMap<K, Vec<usize>>>,
}

impl<K: CheckKey> Default for RecordStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CheckKey> RecordStore<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            by_key: HashMap::new(),
            by_id: HashMap::new(),
            by_id_key: HashMap::new(),
        }
    }

    /// Insert one record into every index.
    pub fn add(&mut self, record: Record<K>) {
        let idx = self.records.len();
        let key = record.check_key();

        self.by_key.entry(key).or_default().push(idx);
        self.by_id
            .entry(record.id().to_string())
            .or_default()
            .push(idx);
        self.by_id_key
            .entry(record.id().to_string())
            .or_default()
            .entry(key)
            .or_default()
            .push(idx);

        self.records.push(record);
    }

    /// Insert records in order; bucket order follows insertion order.
    pub fn add_all(&mut self, records: impl IntoIterator<Item = Record<K>>) {
        for record in records {
            self.add(record);
        }
    }

    /// Every record for one key, across all elements.
    #[must_use]
    pub fn by_check_key(&self, key: K) -> Vec<&Record<K>> {
        self.resolve(self.by_key.get(&key))
    }

    /// Distinct element ids, in no particular order.
    #[must_use]
    pub fn all_ids(&self) -> Vec<&str> {
        self.by_id.keys().map(String::as_str).collect()
    }

    /// Every record belonging to one element.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Vec<&Record<K>> {
        self.resolve(self.by_id.get(id))
    }

    /// The record(s) for one attribute of one element.
    #[must_use]
    pub fn by_check_key_and_id(&self, key: K, id: &str) -> Vec<&Record<K>> {
        self.resolve(self.by_id_key.get(id).and_then(|keys| keys.get(&key)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Record<K>> {
        self.records.iter()
    }

    fn resolve(&self, positions: Option<&Vec<usize>>) -> Vec<&Record<K>> {
        positions
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|&i| &self.records[i])
            .collect()
    }
}

impl<K: CheckKey> Extend<Record<K>> for RecordStore<K> {
    fn extend<T: IntoIterator<Item = Record<K>>>(&mut self, iter: T) {
        self.add_all(iter);
    }
}

impl<K: CheckKey> FromIterator<Record<K>> for RecordStore<K> {
    fn from_iter<T: IntoIterator<Item = Record<K>>>(iter: T) -> Self {
        let mut store = Self::new();
        store.add_all(iter);
        store
    }
}
