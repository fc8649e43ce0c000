//! Required/optional weighted aggregation.
//!
//! Every granularity uses the same rule: average the required scores, average
//! the optional scores, and when both buckets are populated take the mean of
//! the two averages. The buckets weigh 50/50 regardless of how many checks
//! fill each one. An empty set scores 0. Scores are never clamped.

use super::record::{CheckKey, Record};
use super::store::RecordStore;
use serde::Serialize;

/// Raw sums and counts for the two buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreTally {
    pub required_sum: f64,
    pub required_count: usize,
    pub optional_sum: f64,
    pub optional_count: usize,
}

impl ScoreTally {
    pub fn add<K: CheckKey>(&mut self, record: &Record<K>) {
        if record.required() {
            self.required_sum += record.score();
            self.required_count += 1;
        } else {
            self.optional_sum += record.score();
            self.optional_count += 1;
        }
    }

    #[must_use]
    pub fn from_records<'a, K: CheckKey>(records: impl IntoIterator<Item = &'a Record<K>>) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.add(record);
        }
        tally
    }

    #[must_use]
    pub fn required_avg(&self) -> f64 {
        if self.required_count == 0 {
            0.0
        } else {
            self.required_sum / self.required_count as f64
        }
    }

    #[must_use]
    pub fn optional_avg(&self) -> f64 {
        if self.optional_count == 0 {
            0.0
        } else {
            self.optional_sum / self.optional_count as f64
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        match (self.required_count, self.optional_count) {
            (0, 0) => 0.0,
            (0, _) => self.optional_avg(),
            (_, 0) => self.required_avg(),
            _ => (self.required_avg() + self.optional_avg()) / 2.0,
        }
    }
}

/// Aggregate score of any record set.
#[must_use]
pub fn score_of<'a, K: CheckKey>(records: impl IntoIterator<Item = &'a Record<K>>) -> f64 {
    ScoreTally::from_records(records).total()
}

/// Document-level result: the pooled total plus each bucket's average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DocumentScore {
    pub total: f64,
    pub required: f64,
    pub optional: f64,
}

impl<K: CheckKey> RecordStore<K> {
    /// Score of one attribute of one element.
    #[must_use]
    pub fn score_of_attribute(&self, key: K, id: &str) -> f64 {
        score_of(self.by_check_key_and_id(key, id))
    }

    /// Score of one element across all its attributes.
    #[must_use]
    pub fn score_of_element(&self, id: &str) -> f64 {
        score_of(self.by_id(id))
    }

    /// Pooled document score.
    ///
    /// Raw sums and counts are accumulated over every record of every element
    /// before the ratio is taken once, so an element checked on more
    /// attributes carries more weight. This is not the mean of element totals.
    #[must_use]
    pub fn score_of_document(&self) -> DocumentScore {
        // Insertion order keeps the float sums bit-identical between runs.
        let tally = ScoreTally::from_records(self.iter());
        DocumentScore {
            total: tally.total(),
            required: tally.required_avg(),
            optional: tally.optional_avg(),
        }
    }
}
