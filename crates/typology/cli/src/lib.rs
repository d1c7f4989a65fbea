//! Typology CLI - Command-line interface for the classification engine
//!
//! This CLI lets configuration authors and developers:
//! - Validate and inspect a configuration directory
//! - Run a classification with scripted or interactive answers
//! - Resume a second phase from a stored base summary
//! - Park a session in a state file and continue it later

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{inspect, resume, run};
pub use error::{CliError, CliResult};
pub use output::{print_error, OutputFormat};

/// Typology CLI application
#[derive(Parser)]
#[command(name = "typology")]
#[command(about = "Typology - staged personality classification CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding answer_scale.json, question_sets.json,
    /// stage_graph.json and categories.json
    #[arg(short, long, global = true, env = "TYPOLOGY_CONFIG_DIR", default_value = "fixtures/socionics")]
    config_dir: PathBuf,

    /// Output format (table, json, yaml)
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Locale used to render question text
    #[arg(short, long, global = true, default_value = "en")]
    locale: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Validate and inspect the configuration
    Inspect {
        #[command(subcommand)]
        command: inspect::InspectCommands,
    },

    /// Run a classification from the first stage
    Run(run::RunArgs),

    /// Resume a second phase from rationality, base and orientation
    Resume(resume::ResumeArgs),
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing; logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let ctx = commands::Context {
        config_dir: cli.config_dir,
        format: cli.output,
        locale: cli.locale,
    };

    match cli.command {
        Commands::Inspect { command } => inspect::execute(command, &ctx),
        Commands::Run(args) => run::execute(args, &ctx),
        Commands::Resume(args) => resume::execute(args, &ctx),
    }
}
