//! Metadata structures for SBOM documents and components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SBOM format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SbomFormat {
    CycloneDx,
    Spdx,
}

impl std::fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycloneDx => write!(f, "CycloneDX"),
            Self::Spdx => write!(f, "SPDX"),
        }
    }
}

/// Serialization the document was read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileFormat {
    #[default]
    Json,
    TagValue,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::TagValue => write!(f, "tag-value"),
        }
    }
}

/// Declared completeness of the dependency graph (CycloneDX compositions).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletenessDeclaration {
    Complete,
    Incomplete,
    IncompleteFirstPartyOnly,
    Unknown,
    #[default]
    NotSpecified,
}

impl CompletenessDeclaration {
    #[must_use]
    pub fn from_aggregate(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "complete" => Self::Complete,
            "incomplete" => Self::Incomplete,
            "incomplete_first_party_only" | "incomplete_first_party_proprietary_only" => {
                Self::IncompleteFirstPartyOnly
            }
            "unknown" => Self::Unknown,
            _ => Self::NotSpecified,
        }
    }

    /// Whether the author made any statement at all.
    #[must_use]
    pub const fn is_declared(self) -> bool {
        !matches!(self, Self::NotSpecified)
    }
}

impl std::fmt::Display for CompletenessDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Incomplete => write!(f, "incomplete"),
            Self::IncompleteFirstPartyOnly => write!(f, "incomplete_first_party_only"),
            Self::Unknown => write!(f, "unknown"),
            Self::NotSpecified => write!(f, "not specified"),
        }
    }
}

/// Document-level metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// SBOM format type
    pub format: SbomFormat,
    /// Serialization (JSON or SPDX tag-value)
    pub file_format: FileFormat,
    /// Specification version ("1.5", "2.3")
    pub spec_version: String,
    /// CycloneDX serial number or SPDX document namespace
    pub serial_number: Option<String>,
    /// SPDX document identifier (`SPDXRef-DOCUMENT`)
    pub spdx_id: Option<String>,
    /// Document name
    pub name: Option<String>,
    /// SPDX data license
    pub data_license: Option<String>,
    /// SPDX license list version the document was written against
    pub license_list_version: Option<String>,
    /// Free-form document comment
    pub comment: Option<String>,
    /// Creation timestamp, `None` when absent or unparsable
    pub created: Option<DateTime<Utc>>,
    /// Persons, organizations and tools that produced the document
    pub creators: Vec<Creator>,
    /// Supplier of the described product
    pub supplier: Option<Organization>,
    /// Manufacturer of the described product
    pub manufacturer: Option<Organization>,
    /// Lifecycle phases (CycloneDX `metadata.lifecycles`)
    pub lifecycles: Vec<String>,
    /// Whether the document carries a signature block
    pub has_signature: bool,
    /// Completeness of the dependency graph
    pub completeness: CompletenessDeclaration,
    /// Links to other SBOMs (CycloneDX `bom` references, SPDX external document refs)
    pub bom_links: Vec<String>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            format: SbomFormat::CycloneDx,
            file_format: FileFormat::Json,
            spec_version: String::new(),
            serial_number: None,
            spdx_id: None,
            name: None,
            data_license: None,
            license_list_version: None,
            comment: None,
            created: None,
            creators: Vec::new(),
            supplier: None,
            manufacturer: None,
            lifecycles: Vec::new(),
            has_signature: false,
            completeness: CompletenessDeclaration::NotSpecified,
            bom_links: Vec::new(),
        }
    }
}

impl DocumentMetadata {
    /// Creators of the given type
    pub fn creators_of(&self, creator_type: CreatorType) -> impl Iterator<Item = &Creator> {
        self.creators
            .iter()
            .filter(move |c| c.creator_type == creator_type)
    }

    /// Persons and organizations, i.e. every creator that is not a tool.
    pub fn authors(&self) -> impl Iterator<Item = &Creator> {
        self.creators
            .iter()
            .filter(|c| c.creator_type != CreatorType::Tool)
    }
}

/// Creator information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Creator type
    pub creator_type: CreatorType,
    /// Creator name or identifier
    pub name: String,
    /// Optional email
    pub email: Option<String>,
    /// Optional URL
    pub url: Option<String>,
}

impl Creator {
    #[must_use]
    pub fn new(creator_type: CreatorType, name: impl Into<String>) -> Self {
        Self {
            creator_type,
            name: name.into(),
            email: None,
            url: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Whether the creator can be reached by email or URL.
    #[must_use]
    pub fn has_contact(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
            || self.url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

/// Type of creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatorType {
    Person,
    Organization,
    Tool,
}

/// Organization/supplier information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization name
    pub name: String,
    /// Contact URLs
    pub urls: Vec<String>,
    /// Contact persons
    pub contacts: Vec<Contact>,
}

impl Organization {
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            urls: Vec::new(),
            contacts: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_contact(&self) -> bool {
        !self.urls.is_empty() || self.contacts.iter().any(|c| c.email.is_some())
    }

    /// Name, or the first contact name when the organization is unnamed.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        if !self.name.trim().is_empty() {
            return Some(&self.name);
        }
        self.contacts.iter().find_map(|c| c.name.as_deref())
    }

    /// First email or URL that reaches this organization.
    #[must_use]
    pub fn first_contact(&self) -> Option<&str> {
        self.contacts
            .iter()
            .find_map(|c| c.email.as_deref())
            .or_else(|| self.urls.first().map(String::as_str))
    }
}

/// Contact information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Component type classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ComponentType {
    Application,
    Framework,
    #[default]
    Library,
    Container,
    OperatingSystem,
    Device,
    Firmware,
    File,
    Data,
    Other(String),
}

impl ComponentType {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "application" => Self::Application,
            "framework" => Self::Framework,
            "library" => Self::Library,
            "container" => Self::Container,
            "operating-system" | "operating_system" => Self::OperatingSystem,
            "device" => Self::Device,
            "firmware" => Self::Firmware,
            "file" => Self::File,
            "data" => Self::Data,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Application => write!(f, "application"),
            Self::Framework => write!(f, "framework"),
            Self::Library => write!(f, "library"),
            Self::Container => write!(f, "container"),
            Self::OperatingSystem => write!(f, "operating-system"),
            Self::Device => write!(f, "device"),
            Self::Firmware => write!(f, "firmware"),
            Self::File => write!(f, "file"),
            Self::Data => write!(f, "data"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Cryptographic hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash {
    pub algorithm: HashAlgorithm,
    /// Hex encoded value
    pub value: String,
}

impl Hash {
    #[must_use]
    pub const fn new(algorithm: HashAlgorithm, value: String) -> Self {
        Self { algorithm, value }
    }
}

/// Hash algorithm types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b256,
    Blake2b384,
    Blake2b512,
    Blake3,
    Other(String),
}

impl HashAlgorithm {
    /// Accepts both CycloneDX (`SHA-256`) and SPDX (`SHA256`) spellings.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_uppercase().replace(['-', '_'], "").as_str() {
            "MD5" => Self::Md5,
            "SHA1" => Self::Sha1,
            "SHA256" => Self::Sha256,
            "SHA384" => Self::Sha384,
            "SHA512" => Self::Sha512,
            "SHA3256" => Self::Sha3_256,
            "SHA3384" => Self::Sha3_384,
            "SHA3512" => Self::Sha3_512,
            "BLAKE2B256" => Self::Blake2b256,
            "BLAKE2B384" => Self::Blake2b384,
            "BLAKE2B512" => Self::Blake2b512,
            "BLAKE3" => Self::Blake3,
            _ => Self::Other(value.to_string()),
        }
    }

    /// SHA-256 or anything at least as strong.
    #[must_use]
    pub const fn is_strong(&self) -> bool {
        !matches!(self, Self::Md5 | Self::Sha1 | Self::Other(_))
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Md5 => write!(f, "MD5"),
            Self::Sha1 => write!(f, "SHA-1"),
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha384 => write!(f, "SHA-384"),
            Self::Sha512 => write!(f, "SHA-512"),
            Self::Sha3_256 => write!(f, "SHA3-256"),
            Self::Sha3_384 => write!(f, "SHA3-384"),
            Self::Sha3_512 => write!(f, "SHA3-512"),
            Self::Blake2b256 => write!(f, "BLAKE2b-256"),
            Self::Blake2b384 => write!(f, "BLAKE2b-384"),
            Self::Blake2b512 => write!(f, "BLAKE2b-512"),
            Self::Blake3 => write!(f, "BLAKE3"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// External reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalReference {
    pub ref_type: ExternalRefType,
    /// URL or locator
    pub url: String,
    pub comment: Option<String>,
    /// Hashes of the referenced content
    pub hashes: Vec<Hash>,
}

impl ExternalReference {
    #[must_use]
    pub const fn new(ref_type: ExternalRefType, url: String) -> Self {
        Self {
            ref_type,
            url,
            comment: None,
            hashes: Vec::new(),
        }
    }
}

/// External reference types relevant to compliance checks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalRefType {
    Vcs,
    Website,
    Bom,
    SourceDistribution,
    BinaryDistribution,
    Purl,
    Cpe,
    Other(String),
}

impl ExternalRefType {
    /// Maps a CycloneDX `externalReferences[].type` or SPDX `referenceType`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "vcs" => Self::Vcs,
            "website" => Self::Website,
            "bom" => Self::Bom,
            "source-distribution" => Self::SourceDistribution,
            "distribution" | "distribution-intake" => Self::BinaryDistribution,
            "purl" => Self::Purl,
            "cpe22type" | "cpe23type" => Self::Cpe,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ExternalRefType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vcs => write!(f, "vcs"),
            Self::Website => write!(f, "website"),
            Self::Bom => write!(f, "bom"),
            Self::SourceDistribution => write!(f, "source-distribution"),
            Self::BinaryDistribution => write!(f, "distribution"),
            Self::Purl => write!(f, "purl"),
            Self::Cpe => write!(f, "cpe"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Dependency relationship type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    DependsOn,
    OptionalDependsOn,
    DevDependsOn,
    BuildDependsOn,
    RuntimeDependsOn,
    /// SPDX `DESCRIBES`
    Describes,
    Contains,
    Other(String),
}

impl DependencyType {
    /// Maps an SPDX relationship type.
    #[must_use]
    pub fn from_spdx(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "DEPENDS_ON" | "DEPENDENCY_OF" => Self::DependsOn,
            "OPTIONAL_DEPENDENCY_OF" => Self::OptionalDependsOn,
            "DEV_DEPENDENCY_OF" => Self::DevDependsOn,
            "BUILD_DEPENDENCY_OF" => Self::BuildDependsOn,
            "RUNTIME_DEPENDENCY_OF" => Self::RuntimeDependsOn,
            "DESCRIBES" => Self::Describes,
            "CONTAINS" => Self::Contains,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DependsOn => write!(f, "depends-on"),
            Self::OptionalDependsOn => write!(f, "optional-depends-on"),
            Self::DevDependsOn => write!(f, "dev-depends-on"),
            Self::BuildDependsOn => write!(f, "build-depends-on"),
            Self::RuntimeDependsOn => write!(f, "runtime-depends-on"),
            Self::Describes => write!(f, "describes"),
            Self::Contains => write!(f, "contains"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Key-value property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_algorithm_spellings() {
        assert_eq!(HashAlgorithm::parse("SHA-256"), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::parse("SHA256"), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::parse("sha3-512"), HashAlgorithm::Sha3_512);
        assert!(!HashAlgorithm::parse("MD5").is_strong());
        assert!(HashAlgorithm::parse("SHA512").is_strong());
    }

    #[test]
    fn test_creator_contact() {
        let bare = Creator::new(CreatorType::Person, "Jane");
        assert!(!bare.has_contact());
        assert!(bare.with_email("jane@example.com").has_contact());
    }

    #[test]
    fn test_completeness_parse() {
        assert_eq!(
            CompletenessDeclaration::from_aggregate("complete"),
            CompletenessDeclaration::Complete
        );
        assert!(!CompletenessDeclaration::from_aggregate("bogus").is_declared());
    }

    #[test]
    fn test_authors_exclude_tools() {
        let meta = DocumentMetadata {
            creators: vec![
                Creator::new(CreatorType::Tool, "syft"),
                Creator::new(CreatorType::Organization, "Acme"),
            ],
            ..Default::default()
        };
        assert_eq!(meta.authors().count(), 1);
        assert_eq!(meta.creators_of(CreatorType::Tool).count(), 1);
    }
}
