//! Quill CLI - a terminal host for the Quill scripting feature.

mod capabilities;
mod commands;
mod host;
mod output;
mod session;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env};
use miette::{Result, miette};
use quill_core::FeatureConfig;

use crate::session::Session;

#[derive(Parser)]
#[command(name = "quill")]
#[command(
    author,
    version,
    about = "Author and run rhai snippets against a live host"
)]
struct Cli {
    /// Product namespace under the application-data directory
    #[arg(long)]
    product: Option<String>,

    /// Feature name, used as the configuration directory name
    #[arg(long)]
    feature: Option<String>,

    /// Configuration directory (overrides the platform default)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// JSON feature configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run commands from a session file instead of the prompt
    #[arg(short, long, value_name = "FILE")]
    batch: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = feature_config(&cli)?;
    let session = Session::start(&config)?;

    match cli.batch {
        Some(path) => commands::batch::execute(session, &path),
        None => commands::repl::execute(session, io::stdin().lock()),
    }
}

/// Builds the feature configuration: the JSON file if given, then flags.
fn feature_config(cli: &Cli) -> Result<FeatureConfig> {
    let mut config = match &cli.config {
        Some(path) => FeatureConfig::load(path).map_err(|e| miette!("{}", e))?,
        None => FeatureConfig::default(),
    };

    if let Some(product) = &cli.product {
        config.product = product.clone();
    }

    if let Some(feature) = &cli.feature {
        config.feature = feature.clone();
    }

    if let Some(dir) = &cli.config_dir {
        config.config_dir = Some(dir.clone());
    }

    Ok(config)
}
