use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use pylonmap_core::PropertySchema;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pylonmap", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level [default: info, or the config file's level]
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Configuration file (defaults to <config_dir>/pylonmap/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a network export into a GeoJSON FeatureCollection
    Convert(ConvertArgs),
    /// Load and validate an export without writing anything
    Inspect(InspectArgs),
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Network export (XML)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
    /// Voltage class document (XML)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub voltage: Option<PathBuf>,
    /// Destination GeoJSON file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,
    /// Do not resolve voltages even when a voltage document is given
    #[arg(long)]
    pub no_voltage: bool,
    /// List supports rejected for missing coordinates
    #[arg(long)]
    pub missing_coordinates: bool,
    /// Path of the missing-coordinate list (implies --missing-coordinates)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub missing_log: Option<PathBuf>,
    /// Feature property layout
    #[arg(long, value_enum)]
    pub schema: Option<SchemaChoice>,
    /// Write a JSON report with statistics and diagnostics
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Network export (XML)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
    /// Voltage class document (XML)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub voltage: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the default configuration file
    Init {
        /// Destination (defaults to <config_dir>/pylonmap/config.toml)
        #[arg(long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaChoice {
    Extended,
    Simple,
}

impl From<SchemaChoice> for PropertySchema {
    fn from(choice: SchemaChoice) -> Self {
        match choice {
            SchemaChoice::Extended => PropertySchema::Extended,
            SchemaChoice::Simple => PropertySchema::Simple,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
