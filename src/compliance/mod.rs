//! Compliance evaluation.
//!
//! A run creates one [`RecordStore`], lets every check of the chosen
//! standard append [`Record`]s to it, then joins the records with the
//! standard's metadata into ordered [`Section`]s and scores the document.
//!
//! Scores are computed at three granularities with one rule: the mean of
//! the required average and the optional average, or whichever bucket is
//! populated. See [`score`].

pub mod check;
pub mod context;
pub mod record;
pub mod report;
pub mod score;
pub mod section;
pub mod standard;
pub mod standards;
pub mod store;

pub use check::Check;
pub use context::RunContext;
pub use record::{CheckKey, Maturity, Record, DOC_ID, PRIMARY_COMPONENT_ID};
pub use report::{ComplianceReport, StandardDescriptor, Summary, MAX_SCORE};
pub use score::{score_of, DocumentScore, ScoreTally};
pub use section::{build_sections, compare_clause_ids, validate_metadata, Section, SectionMeta, DOC_LABEL};
pub use standard::{evaluate, Standard};
pub use standards::StandardKind;
pub use store::RecordStore;
