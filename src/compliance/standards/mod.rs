//! The supported standards and name-based dispatch between them.

mod bsi_v1;
mod bsi_v2;
pub(crate) mod common;
mod fsct;
mod ntia;
mod oct;

pub use bsi_v1::{BsiV1, BsiV1Key};
pub use bsi_v2::{BsiV2, BsiV2Key};
pub use fsct::{Fsct, FsctKey};
pub use ntia::{Ntia, NtiaKey};
pub use oct::{OctKey, OpenChainTelco};

use super::report::{ComplianceReport, StandardDescriptor};
use super::standard::{evaluate, Standard};
use crate::error::{Result, SbomComplianceError};
use crate::model::NormalizedSbom;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Selectable standard
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum StandardKind {
    /// NTIA minimum elements
    #[default]
    #[value(alias = "ntia-minimum-elements")]
    Ntia,
    /// BSI TR-03183-2 v1.1
    #[value(name = "bsi", alias = "bsi-v1.1")]
    #[serde(rename = "bsi")]
    BsiV11,
    /// BSI TR-03183-2 v2.0
    #[value(name = "bsi-v2", alias = "bsi-v2.0")]
    #[serde(rename = "bsi-v2")]
    BsiV20,
    /// OpenChain Telco v1.0
    #[value(alias = "openchain-telco")]
    Oct,
    /// Framing Software Component Transparency v3
    #[value(alias = "fsct-v3")]
    Fsct,
}

impl StandardKind {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Ntia, Self::BsiV11, Self::BsiV20, Self::Oct, Self::Fsct]
    }

    /// Name accepted on the command line and in config files.
    #[must_use]
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::Ntia => "ntia",
            Self::BsiV11 => "bsi",
            Self::BsiV20 => "bsi-v2",
            Self::Oct => "oct",
            Self::Fsct => "fsct",
        }
    }

    #[must_use]
    pub fn descriptor(self) -> StandardDescriptor {
        match self {
            Self::Ntia => Ntia.descriptor(),
            Self::BsiV11 => BsiV1.descriptor(),
            Self::BsiV20 => BsiV2.descriptor(),
            Self::Oct => OpenChainTelco.descriptor(),
            Self::Fsct => Fsct.descriptor(),
        }
    }

    /// Evaluate a document against this standard.
    pub fn evaluate(self, sbom: &NormalizedSbom) -> Result<ComplianceReport> {
        tracing::info!(
            standard = self.cli_name(),
            components = sbom.component_count(),
            "Evaluating compliance"
        );
        match self {
            Self::Ntia => evaluate(&Ntia, sbom),
            Self::BsiV11 => evaluate(&BsiV1, sbom),
            Self::BsiV20 => evaluate(&BsiV2, sbom),
            Self::Oct => evaluate(&OpenChainTelco, sbom),
            Self::Fsct => evaluate(&Fsct, sbom),
        }
    }
}

impl std::fmt::Display for StandardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for StandardKind {
    type Err = SbomComplianceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ntia" | "ntia-minimum-elements" => Ok(Self::Ntia),
            "bsi" | "bsi-v1" | "bsi-v1.1" => Ok(Self::BsiV11),
            "bsi-v2" | "bsi-v2.0" => Ok(Self::BsiV20),
            "oct" | "openchain-telco" => Ok(Self::Oct),
            "fsct" | "fsct-v3" => Ok(Self::Fsct),
            other => Err(SbomComplianceError::unknown_standard(other)),
        }
    }
}
