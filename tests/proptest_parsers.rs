//! Property-based tests for the readers and the evaluation behind them.
//!
//! Arbitrary input must never panic: it either fails to parse, or parses
//! into a document that every standard can evaluate.

use proptest::prelude::*;
use sbom_compliance::compliance::{StandardKind, MAX_SCORE};
use sbom_compliance::parsers::FormatDetector;
use sbom_compliance::parse_sbom_str;

fn evaluate_all(input: &str) -> Result<(), TestCaseError> {
    if let Ok(sbom) = parse_sbom_str(input) {
        for standard in StandardKind::all() {
            let report = standard.evaluate(&sbom);
            prop_assert!(report.is_ok(), "{standard} failed on {input:?}");
            if let Ok(report) = report {
                prop_assert!((0.0..=MAX_SCORE).contains(&report.summary.total_score));
            }
        }
    }
    Ok(())
}

proptest! {
    // Parser tests only assert no-panic, since random input is expected to
    // produce Err in almost all cases.
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn parse_sbom_str_doesnt_panic(s in "\\PC{0,2000}") {
        let _ = parse_sbom_str(&s);
        let _ = FormatDetector::new().detect_from_content(&s);
    }

    #[test]
    fn json_like_input_doesnt_panic(
        s in prop::string::string_regex(r#"\{[^\}]{0,500}\}"#).unwrap()
    ) {
        evaluate_all(&s)?;
    }

    #[test]
    fn spdx_tag_value_like_doesnt_panic(
        key in "(SPDXVersion|SPDXID|PackageName|PackageVersion|Relationship|Creator|Created|[A-Za-z]{1,20})",
        value in "\\PC{0,100}",
    ) {
        let input = format!("SPDXVersion: SPDX-2.3\n{key}: {value}\n");
        evaluate_all(&input)?;
    }

    #[test]
    fn cyclonedx_components_evaluate(
        version in "1\\.[3-6]",
        names in prop::collection::vec("[a-z][a-z0-9-]{0,12}", 0..8),
    ) {
        let components: Vec<String> = names
            .iter()
            .map(|n| format!(r#"{{"type": "library", "name": "{n}"}}"#))
            .collect();
        let input = format!(
            r#"{{"bomFormat": "CycloneDX", "specVersion": "{version}", "components": [{}]}}"#,
            components.join(",")
        );
        let sbom = parse_sbom_str(&input);
        prop_assert!(sbom.is_ok());
        evaluate_all(&input)?;
    }

    #[test]
    fn spdx_partial_json_doesnt_panic(
        version in "SPDX-[0-9]\\.[0-9]",
        extra in "\\PC{0,200}",
    ) {
        let input = format!(r#"{{"spdxVersion": "{version}", "SPDXID": "SPDXRef-DOCUMENT", {extra}}}"#);
        evaluate_all(&input)?;
    }
}
