//! Pipeline, config and CLI handler integration tests.
//!
//! These exercise the parse → evaluate → report path with real fixture files
//! and config files written to temporary directories.

use sbom_compliance::cli::run_compliance;
use sbom_compliance::compliance::StandardKind;
use sbom_compliance::config::{load_config_file, AppConfig, ConfigOverrides, Validatable};
use sbom_compliance::pipeline::{
    evaluate_standard, exit_codes, output_report, parse_sbom_with_context, PipelineError,
};
use sbom_compliance::reports::ReportFormat;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

// ============================================================================
// Pipeline stages
// ============================================================================

mod stages {
    use super::*;

    #[test]
    fn parse_cyclonedx_fixture() {
        let sbom = parse_sbom_with_context(&fixture_path("cyclonedx/complete.cdx.json"), true)
            .expect("parse should succeed");
        assert_eq!(sbom.component_count(), 3);
        assert!(sbom.primary_component().is_some());
    }

    #[test]
    fn parse_spdx_fixture() {
        let sbom = parse_sbom_with_context(&fixture_path("spdx/complete.spdx.json"), true)
            .expect("parse should succeed");
        assert_eq!(sbom.component_count(), 2);
        assert_eq!(
            sbom.primary_component().map(|c| c.name.as_str()),
            Some("acme-gateway")
        );
    }

    #[test]
    fn parse_missing_file_is_parse_failure() {
        let result = parse_sbom_with_context(Path::new("/nonexistent/bom.json"), true);
        assert!(matches!(result, Err(PipelineError::ParseFailed { .. })));
    }

    #[test]
    fn evaluate_then_write_table_to_file() {
        let tmp = TempDir::new().unwrap();
        let source = fixture_path("cyclonedx/complete.cdx.json");
        let sbom = parse_sbom_with_context(&source, true).unwrap();
        let report = evaluate_standard(&sbom, StandardKind::BsiV11).unwrap();

        let mut config = AppConfig::default();
        config.output.format = ReportFormat::Table;
        config.output.file = Some(tmp.path().join("report.txt"));
        output_report(&report, &source, &config.output, true).unwrap();

        let written = std::fs::read_to_string(tmp.path().join("report.txt")).unwrap();
        assert!(written.starts_with("BSI TR-03183-2 v1.1 Compliance Report"));
        assert!(written.contains("complete.cdx.json"));
        assert!(!written.contains('\x1b'));
    }
}

// ============================================================================
// Config files
// ============================================================================

mod config_files {
    use super::*;

    #[test]
    fn config_file_drives_the_run() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out.json");
        let config_path = tmp.path().join(".sbom-compliance.yaml");
        std::fs::write(
            &config_path,
            format!(
                "compliance:\n  standard: oct\noutput:\n  format: json\n  file: {}\n",
                out.display()
            ),
        )
        .unwrap();

        let (config, loaded_from) =
            AppConfig::from_file_with_overrides(Some(&config_path), &ConfigOverrides::default());
        assert_eq!(loaded_from, Some(config_path));
        assert_eq!(config.standard().unwrap(), StandardKind::Oct);

        let code = run_compliance(&fixture_path("spdx/complete.spdx.json"), &config, true).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(json["report_name"], "OpenChain Telco Compliance Report");
    }

    #[test]
    fn cli_overrides_beat_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom.yaml");
        std::fs::write(
            &config_path,
            "compliance:\n  standard: oct\n  min_score: 9.5\noutput:\n  format: json\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            standard: Some(StandardKind::Fsct),
            format: Some(ReportFormat::Basic),
            ..ConfigOverrides::default()
        };
        let (config, _) = AppConfig::from_file_with_overrides(Some(&config_path), &overrides);

        assert_eq!(config.standard().unwrap(), StandardKind::Fsct);
        assert_eq!(config.output.format, ReportFormat::Basic);
        assert_eq!(config.compliance.min_score, Some(9.5));
    }

    #[test]
    fn invalid_values_are_reported_by_field() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(
            &config_path,
            "compliance:\n  standard: cra\n  min_score: 11\n",
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["compliance.standard", "compliance.min_score"]);
    }
}

// ============================================================================
// CLI handler
// ============================================================================

mod handler {
    use super::*;

    fn config_writing_to(dir: &TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.output.file = Some(dir.path().join("report.txt"));
        config
    }

    #[test]
    fn full_marks_pass_any_threshold() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_writing_to(&tmp);
        config.compliance.min_score = Some(10.0);

        let code = run_compliance(&fixture_path("cyclonedx/complete.cdx.json"), &config, true)
            .unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let written = std::fs::read_to_string(tmp.path().join("report.txt")).unwrap();
        assert!(written.contains("Score:10.0 RequiredScore:10.0 OptionalScore:10.0"));
    }

    #[test]
    fn sparse_document_fails_threshold() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_writing_to(&tmp);
        config.compliance.min_score = Some(5.0);

        let code =
            run_compliance(&fixture_path("cyclonedx/sparse.cdx.json"), &config, true).unwrap();
        assert_eq!(code, exit_codes::BELOW_MIN_SCORE);
        // The report is still written before the gate is applied
        assert!(tmp.path().join("report.txt").exists());
    }

    #[test]
    fn empty_output_file_name_is_rejected() {
        let mut config = AppConfig::default();
        config.output.file = Some(PathBuf::new());

        let err = run_compliance(&fixture_path("cyclonedx/complete.cdx.json"), &config, true)
            .unwrap_err();
        assert!(err.to_string().contains("output.file"));
    }
}
