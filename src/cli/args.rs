use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments for PbiLink
#[derive(Parser, Debug)]
#[command(
    name = "pbilink",
    version = env!("CARGO_PKG_VERSION"),
    about = "Command-line companion for the pbi-tools Power BI toolkit",
    long_about = "Dispatches extract, compile and watch actions to the pbi-tools command-line tool, attaches watches to running Power BI Desktop sessions, and installs the tool when missing."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract a .pbix file into source files
    Extract {
        /// Path to the .pbix file
        file: PathBuf,
    },
    /// Compile a source folder back into a PBIT file
    Compile {
        /// Path to the extracted source folder
        folder: PathBuf,
    },
    /// Continuously extract a .pbix file that is open in Power BI Desktop
    Watch {
        /// Path to the open .pbix file
        file: PathBuf,
    },
    /// List live Power BI Desktop sessions
    Status,
    /// Download and install the pbi-tools binary if missing
    Install,
    /// Configuration management commands
    Config(ConfigArgs),
    /// Display version information
    Version,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Create default configuration
    Init {
        /// Output directory for the project configuration
        #[arg(short, long)]
        output: Option<String>,
        /// Global configuration
        #[arg(short, long)]
        global: bool,
    },
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
    /// CSV output
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
