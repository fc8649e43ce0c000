//! Normalized SBOM representation.
//!
//! CycloneDX and SPDX documents are both read into [`NormalizedSbom`], which
//! is the only document shape the compliance checks see.

mod identifiers;
mod license;
mod metadata;
mod sbom;

pub use identifiers::*;
pub use license::*;
pub use metadata::*;
pub use sbom::*;
