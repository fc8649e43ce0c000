//! Configuration for compliance runs.
//!
//! Settings come from a YAML file discovered on disk, then explicit CLI flags
//! are layered on top with [`AppConfig::merge`]. Everything is validated
//! before a document is read.
//!
//! ```yaml
//! compliance:
//!   standard: bsi-v2
//!   min_score: 7.0
//! output:
//!   format: table
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{AppConfig, ComplianceConfig, ConfigOverrides, OutputConfig, DEFAULT_STANDARD};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the config file format.
///
/// Editors can use it for validation and autocompletion of
/// `.sbom-compliance.yaml` files.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_sections() {
        let schema = generate_json_schema().unwrap();
        assert!(schema.contains("\"compliance\""));
        assert!(schema.contains("\"min_score\""));
        assert!(schema.contains("\"no_color\""));
    }
}
