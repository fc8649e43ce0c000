//! Aligned, per-section table for terminal review.

use super::{ansi_color, score_color, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::compliance::{ComplianceReport, Section};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELEMENT_WIDTH: usize = 30;
const SECTION_WIDTH: usize = 10;
const NAME_WIDTH: usize = 30;
const FIELD_WIDTH: usize = 34;
const RESULT_WIDTH: usize = 40;
const MATURITY_WIDTH: usize = 12;

/// Table reporter
pub struct TableReporter {
    /// Result column width; longer results wrap onto continuation lines
    result_width: usize,
}

impl TableReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            result_width: RESULT_WIDTH,
        }
    }

    #[must_use]
    pub const fn result_width(mut self, width: usize) -> Self {
        self.result_width = if width < 8 { 8 } else { width };
        self
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate(
        &self,
        report: &ComplianceReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let colored = config.colored;
        let with_maturity = report.sections.iter().any(|s| s.maturity.is_some());
        let mut lines = Vec::new();

        lines.push(ansi_color(report.descriptor.report_name, "bold", colored));
        lines.push(format!(
            "{} ({})",
            report.descriptor.subtitle, report.descriptor.revision
        ));
        let summary = &report.summary;
        lines.push(format!(
            "{} {}/{:.1}  Required: {:.1}  Optional: {:.1}  for {}",
            ansi_color("Score:", "cyan", colored),
            ansi_color(
                &format!("{:.1}", summary.total_score),
                score_color(summary.total_score),
                colored
            ),
            summary.max_score,
            summary.required_elements_score,
            summary.optional_elements_score,
            config.file_name
        ));
        lines.push(String::new());

        let mut header = vec![
            pad("ELEMENT ID", ELEMENT_WIDTH),
            pad("SECTION ID", SECTION_WIDTH),
            pad("NAME", NAME_WIDTH),
            pad("DATA FIELD", FIELD_WIDTH),
            pad("RESULT", self.result_width),
        ];
        if with_maturity {
            header.push(pad("MATURITY", MATURITY_WIDTH));
        }
        header.push("SCORE".to_string());
        let header = header.join(" ");
        let rule_width = UnicodeWidthStr::width(header.as_str());
        lines.push(ansi_color(&header, "bold", colored));
        lines.push("─".repeat(rule_width));

        for section in &report.sections {
            self.push_row(&mut lines, section, with_maturity, colored);
        }

        Ok(lines.join("\n") + "\n")
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}

impl TableReporter {
    fn push_row(&self, lines: &mut Vec<String>, s: &Section, with_maturity: bool, colored: bool) {
        // Element ids wrap rather than truncate so a disambiguating suffix stays visible
        let elements = wrap(&s.element_id, ELEMENT_WIDTH);
        let results = wrap(&s.element_result, self.result_width);
        let score = ansi_color(&format!("{:.1}", s.score), score_color(s.score), colored);

        for i in 0..elements.len().max(results.len()) {
            let first = i == 0;
            let cell = |text: &str, width: usize| {
                if first {
                    pad(&truncate(text, width), width)
                } else {
                    " ".repeat(width)
                }
            };
            let line = |chunks: &[String], width: usize| {
                pad(chunks.get(i).map_or("", String::as_str), width)
            };
            let mut cols = vec![
                line(&elements, ELEMENT_WIDTH),
                cell(&s.section_id, SECTION_WIDTH),
                cell(&s.section_title, NAME_WIDTH),
                cell(&s.section_data_field, FIELD_WIDTH),
                line(&results, self.result_width),
            ];
            if with_maturity {
                let label = s.maturity.map_or("-", |m| m.label());
                cols.push(cell(label, MATURITY_WIDTH));
            }
            if first {
                cols.push(score.clone());
            }
            lines.push(cols.join(" ").trim_end().to_string());
        }
    }
}

/// Pad to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    if used >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - used))
    }
}

/// Truncate to `width` display columns, marking the cut with "...".
fn truncate(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    let room = width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > room {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

/// Break text into lines of at most `width` display columns, preferring
/// whitespace boundaries. Always returns at least one line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);
        let sep = usize::from(!current.is_empty());
        if current_width + sep + word_width <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += sep + word_width;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        for ch in word.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if current_width + w > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += w;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
