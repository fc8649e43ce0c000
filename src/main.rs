//! sbom-compliance: score SBOMs against SBOM standards
//!
//! Evaluates `CycloneDX` and SPDX documents against NTIA minimum elements,
//! BSI TR-03183-2, OpenChain Telco and FSCT v3.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_compliance::{
    cli,
    compliance::StandardKind,
    config::{self, AppConfig, ConfigOverrides, CONFIG_FILE_NAMES},
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SBOM Formats:",
        "\n  CycloneDX: 1.3 - 1.6 (JSON)",
        "\n  SPDX:      2.2, 2.3 (JSON, tag-value)",
        "\n\nStandards:",
        "\n  ntia, bsi, bsi-v2, oct, fsct",
        "\n\nOutput Formats:",
        "\n  basic, table, json"
    )
}

#[derive(Parser)]
#[command(name = "sbom-compliance")]
#[command(version, long_version = build_long_version())]
#[command(about = "Score SBOMs against SBOM compliance standards", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Report produced (and --min-score met)
    1  Total score below --min-score
    3  Error occurred

EXAMPLES:
    # NTIA minimum elements, one-line score
    sbom-compliance compliance app.cdx.json

    # BSI TR-03183-2 v2.0 as a table
    sbom-compliance compliance app.spdx.json --standard bsi-v2 -o table

    # CI gate with JSON artifact
    sbom-compliance compliance app.cdx.json -o json -O report.json --min-score 7")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `compliance` subcommand
#[derive(Parser)]
struct ComplianceArgs {
    /// Path to the SBOM (CycloneDX or SPDX)
    sbom: PathBuf,

    /// Standard to evaluate (default: ntia, or the config file's choice)
    #[arg(short, long, value_enum)]
    standard: Option<StandardKind>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Exit with code 1 when the total score is below this value (0-10)
    #[arg(long)]
    min_score: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an SBOM against a compliance standard
    Compliance(ComplianceArgs),

    /// List the supported standards
    Standards,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .sbom-compliance.yaml in the current directory
    Init,
}

fn init_logging(verbose: bool, quiet: bool) {
    let log_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(exit_codes::SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Compliance(args) => {
            let overrides = ConfigOverrides {
                standard: args.standard,
                min_score: args.min_score,
                format: args.output,
                file: args.output_file,
                no_color: cli.no_color,
            };
            let (config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
            if let Some(path) = &loaded_from {
                tracing::debug!("Using config file {}", path.display());
            }

            cli::run_compliance(&args.sbom, &config, cli.quiet)
        }

        Commands::Standards => {
            cli::run_standards()?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sbom-compliance", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema().context("failed to render schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => {
            run_config_action(&action, cli.config.as_deref())?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_config_action(action: &ConfigAction, explicit: Option<&std::path::Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = config::load_or_default(explicit);
            match &loaded_from {
                Some(path) => eprintln!("# Loaded from: {}", path.display()),
                None => eprintln!("# No config file found; showing defaults"),
            }
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string()),
                dirs::config_dir().map(|p| p.join("sbom-compliance").display().to_string()),
                dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in CONFIG_FILE_NAMES {
                eprintln!("  {name}");
            }
            eprintln!();
            match config::discover_config_file(explicit) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(CONFIG_FILE_NAMES[0]);
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, config::generate_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
    }
    Ok(())
}
