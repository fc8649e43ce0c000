//! Output handling for compliance reports.

use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    /// Check if output is to a terminal
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stdout) && std::io::stdout().is_terminal()
    }
}

/// Determine if color should be used based on flags and environment.
///
/// Files never get escape codes; stdout gets them unless `--no-color` or
/// `NO_COLOR` says otherwise.
#[must_use]
pub fn should_use_color(no_color_flag: bool, target: &OutputTarget) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none() && target.is_terminal()
}

/// Write output to the target (stdout or file), ending it with a newline.
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    let terminated = if content.ends_with('\n') {
        content.to_string()
    } else {
        format!("{content}\n")
    };

    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(terminated.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write report to stdout")
        }
        OutputTarget::File(path) => {
            std::fs::write(path, terminated)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Report written to {}", path.display());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_target_from_option() {
        assert_eq!(OutputTarget::from_option(None), OutputTarget::Stdout);

        let path = PathBuf::from("/tmp/report.json");
        assert_eq!(
            OutputTarget::from_option(Some(path.clone())),
            OutputTarget::File(path)
        );
    }

    #[test]
    fn test_no_color_flag_wins() {
        assert!(!should_use_color(true, &OutputTarget::Stdout));
    }

    #[test]
    fn test_files_are_never_colored() {
        let target = OutputTarget::File(PathBuf::from("report.txt"));
        assert!(!should_use_color(false, &target));
    }

    #[test]
    fn test_write_output_to_file_adds_newline() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        let target = OutputTarget::File(path.clone());

        write_output("Score:10.0", &target, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Score:10.0\n");

        write_output("already\n", &target, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "already\n");
    }

    #[test]
    fn test_write_output_bad_directory_fails() {
        let target = OutputTarget::File(PathBuf::from("/no/such/dir/out.txt"));
        assert!(write_output("x", &target, true).is_err());
    }
}
