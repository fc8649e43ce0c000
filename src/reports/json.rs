//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::compliance::{ComplianceReport, Section, Summary};
use chrono::Utc;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(
        &self,
        report: &ComplianceReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let document = JsonComplianceReport {
            report_name: report.descriptor.report_name,
            subtitle: report.descriptor.subtitle,
            revision: report.descriptor.revision,
            run: RunInfo {
                id: uuid::Uuid::new_v4().to_string(),
                generated_at: Utc::now().to_rfc3339(),
                file_name: &config.file_name,
                engine_version: env!("CARGO_PKG_VERSION"),
            },
            tool: ToolInfo {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
                vendor: env!("CARGO_PKG_AUTHORS"),
            },
            summary: &report.summary,
            sections: &report.sections,
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        rendered.map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[derive(Serialize)]
struct JsonComplianceReport<'a> {
    report_name: &'a str,
    subtitle: &'a str,
    revision: &'a str,
    run: RunInfo<'a>,
    tool: ToolInfo,
    summary: &'a Summary,
    sections: &'a [Section],
}

#[derive(Serialize)]
struct RunInfo<'a> {
    id: String,
    generated_at: String,
    file_name: &'a str,
    engine_version: &'static str,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
    vendor: &'static str,
}
