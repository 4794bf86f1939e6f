//! Command-line interface for specboard
//!
//! Provides `status`, `sync` and `lint` subcommands over the status engine.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, ProjectLayout};

mod status;
mod sync;

/// Reconcile journeys, feature scenarios and use cases into one project health view
#[derive(Parser)]
#[command(name = "specboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Path to a config file (TOML or YAML); auto-discovered at the root when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the project status
    Status(status::StatusArgs),

    /// Sync journeys to scenario files and update the manifest
    Sync(sync::SyncArgs),

    /// List validation issues; fails when there are any
    Lint,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let layout = project_layout(&cli.root, cli.config.as_deref())?;
    match cli.command {
        Commands::Status(args) => status::run(&layout, args),
        Commands::Sync(args) => sync::run(&layout, args),
        Commands::Lint => status::lint(&layout),
    }
}

fn project_layout(root: &Path, config_path: Option<&Path>) -> Result<ProjectLayout> {
    let config = load_config(root, config_path)?;
    let layout = ProjectLayout::new(root, config);
    tracing::debug!("Using project root {}", layout.root().display());
    Ok(layout)
}
