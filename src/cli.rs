//! CLI definitions for QPhase.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// QPhase capability registry CLI.
#[derive(Parser)]
#[command(name = "qphase")]
#[command(about = "Inspect and use the QPhase visualizer registry")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: <config_dir>/qphase/qphase.toml)
    #[arg(short, long, env = "QPHASE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List registered entries
    List {
        /// Only show entries in this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Resolve an entry, loading its module if needed
    Resolve {
        /// Registry namespace
        namespace: String,

        /// Key within the namespace
        key: String,
    },

    /// Run plugin discovery and report each plugin's outcome
    Discover {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Render a JSON request with a visualizer renderer
    Render {
        /// Renderer key in the visualizer namespace
        key: String,

        /// Render request file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Write the figure here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}
