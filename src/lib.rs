//! **Score Software Bills of Materials against published SBOM standards.**
//!
//! `sbom-compliance` reads CycloneDX (JSON) and SPDX (JSON, tag-value)
//! documents into one normalized model and evaluates them against:
//!
//! - NTIA minimum elements (July 2021)
//! - BSI TR-03183-2 v1.1 and v2.0
//! - OpenChain Telco v1.0
//! - Framing Software Component Transparency v3 (FSCT)
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the normalized document, [`NormalizedSbom`].
//! - **[`parsers`]**: format detection and the CycloneDX/SPDX readers.
//! - **[`compliance`]**: checks emit scored [`Record`]s into a
//!   [`RecordStore`]; scores are aggregated per attribute, per element and for
//!   the whole document, and the records are grouped into ordered
//!   [`Section`]s for rendering.
//! - **[`reports`]**: JSON, basic and table renderers.
//! - **[`config`]**, **[`pipeline`]** and **[`cli`]**: the command-line
//!   plumbing.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_compliance::{parse_sbom, StandardKind};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sbom = parse_sbom(Path::new("path/to/your/sbom.json"))?;
//!     let report = StandardKind::BsiV20.evaluate(&sbom)?;
//!
//!     println!(
//!         "{}: {:.1}/10 over {} sections",
//!         report.descriptor.short_name,
//!         report.summary.total_score,
//!         report.sections.len()
//!     );
//!     for section in report.failing_sections() {
//!         println!("  {} {} {}", section.element_id, section.section_id, section.section_title);
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Scores are averages of small counts; the casts are bounded in practice
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::similar_names
)]

pub mod cli;
pub mod compliance;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use compliance::{
    ComplianceReport, Record, RecordStore, Section, SectionMeta, Standard, StandardKind, Summary,
};
pub use config::{AppConfig, ConfigError, Validatable};
pub use error::{ErrorContext, Result, SbomComplianceError};
pub use model::{CanonicalId, Component, NormalizedSbom};
pub use parsers::{parse_sbom, parse_sbom_str, SbomParser};
pub use reports::{create_reporter, ReportFormat, ReportGenerator};
