//! Standards command handler.

use crate::compliance::StandardKind;
use crate::pipeline::{write_output, OutputTarget};
use anyhow::Result;
use std::fmt::Write as _;

/// List the supported standards with the names accepted by `--standard`.
pub fn run_standards() -> Result<()> {
    write_output(&standards_listing(), &OutputTarget::Stdout, true)
}

fn standards_listing() -> String {
    let width = StandardKind::all()
        .iter()
        .map(|s| s.cli_name().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for standard in StandardKind::all() {
        let descriptor = standard.descriptor();
        let _ = writeln!(
            out,
            "{:<width$}  {} ({})",
            standard.cli_name(),
            descriptor.short_name,
            descriptor.revision,
        );
    }
    out
}
