//! QPhase - visualizer capability registry
//!
//! Main entry point for the QPhase CLI.

mod cli;
mod cmd_registry;
mod register;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use qphase_config::{Config, ConfigLoader, LogFormat, LoggingConfig};

use cli::{Cli, Commands};

/// Initialize tracing on stderr, keeping stdout for command output.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let level = match logging.level.trim() {
        "" => "info",
        level => level,
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match logging.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

/// Load the explicit config file, or the default one if it exists.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => match Config::default_path() {
            Some(path) => ConfigLoader::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.logging);
    debug!("Starting QPhase v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::List { namespace, format } => {
            cmd_registry::list(&config, namespace.as_deref(), format)
        }
        Commands::Resolve { namespace, key } => cmd_registry::resolve(&config, &namespace, &key),
        Commands::Discover { format } => cmd_registry::discover(&config, format),
        Commands::Render { key, input, output } => {
            cmd_registry::render_figure(&config, &key, &input, output.as_deref())
        }
    }
}
