//! plateloc-correct CLI - plate-location calibration corrector

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use plateloc_correct::{GeometryField, GeometryParams, OutputFormat};

mod commands;

/// Correct radar tracking plate locations recorded with a mismatched setup.
#[derive(Parser)]
#[command(name = "plateloc-correct")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct the plate-location columns of a CSV export
    Correct(CorrectArgs),

    /// Show correction factors for a geometry without reading data
    Factors {
        #[command(flatten)]
        geometry: GeometryArgs,

        /// JSON config file with default geometry
        #[arg(short, long, env = "PLATELOC_CONFIG")]
        config: Option<PathBuf>,

        /// Print factors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a config file with the reference geometry
    InitConfig {
        /// Output config file
        #[arg(short, long, default_value = "plateloc.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct CorrectArgs {
    /// Input CSV file
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    geometry: GeometryArgs,

    /// JSON config file with default geometry and reader options
    #[arg(short, long, env = "PLATELOC_CONFIG")]
    config: Option<PathBuf>,

    /// Honor quoted fields (commas inside quotes)
    #[arg(long)]
    quoted: bool,

    /// Reject non-positive or non-finite distances
    #[arg(long)]
    strict: bool,

    /// Output format (text, csv, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write corrected heights, one per line
    #[arg(long)]
    heights_out: Option<PathBuf>,

    /// Write corrected sides, one per line
    #[arg(long)]
    sides_out: Option<PathBuf>,

    /// Do not print the adjustment summary
    #[arg(long)]
    no_summary: bool,
}

/// Geometry overrides. Values that are not numbers are ignored.
#[derive(Args, Debug, Default)]
pub struct GeometryArgs {
    /// Distance used at calibration (ft)
    #[arg(long, env = "PLATELOC_SETUP_DISTANCE", allow_hyphen_values = true)]
    setup_distance: Option<String>,

    /// Distance during data collection (ft)
    #[arg(long, env = "PLATELOC_ACTUAL_DISTANCE", allow_hyphen_values = true)]
    actual_distance: Option<String>,

    /// Lateral offset used at calibration (ft)
    #[arg(long, env = "PLATELOC_SETUP_SIDE", allow_hyphen_values = true)]
    setup_side: Option<String>,

    /// Lateral offset during data collection (ft)
    #[arg(long, env = "PLATELOC_ACTUAL_SIDE", allow_hyphen_values = true)]
    actual_side: Option<String>,

    /// Height used at calibration (ft)
    #[arg(long, env = "PLATELOC_SETUP_HEIGHT", allow_hyphen_values = true)]
    setup_height: Option<String>,

    /// Height during data collection (ft)
    #[arg(long, env = "PLATELOC_ACTUAL_HEIGHT", allow_hyphen_values = true)]
    actual_height: Option<String>,
}

impl GeometryArgs {
    fn value(&self, field: GeometryField) -> Option<&str> {
        let value = match field {
            GeometryField::SetupDistance => &self.setup_distance,
            GeometryField::ActualDistance => &self.actual_distance,
            GeometryField::SetupSide => &self.setup_side,
            GeometryField::ActualSide => &self.actual_side,
            GeometryField::SetupHeight => &self.setup_height,
            GeometryField::ActualHeight => &self.actual_height,
        };
        value.as_deref()
    }

    /// Layer the overrides on top of `base`.
    pub fn apply(&self, base: GeometryParams) -> GeometryParams {
        let mut geometry = base;
        for field in GeometryField::ALL {
            if let Some(text) = self.value(field) {
                geometry.apply_input(field, text);
            }
        }
        geometry
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Correct(args) => commands::correct::run(args),
        Commands::Factors { geometry, config, json } => {
            commands::factors::run(&geometry, config, json)
        }
        Commands::InitConfig { output, force } => commands::init_config::run(output, force),
    }
}
