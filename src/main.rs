mod commands;
mod draft;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use recurcal_core::config::EngineConfig;
use recurcal_core::recurrence::ExpansionBound;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Filter used until the configuration has been read
const BOOTSTRAP_FILTER: &str = "warn";

#[derive(Parser)]
#[command(name = "recurcal")]
#[command(about = "Validate event drafts and expand recurring calendar series")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a start/end time pair the way the event form does
    Validate {
        /// Start time (HH:MM)
        #[arg(short, long)]
        start: String,

        /// End time (HH:MM)
        #[arg(short, long)]
        end: String,

        /// Print the field messages as JSON
        #[arg(long)]
        json: bool,
    },
    /// Expand a draft into the events that would be saved
    Expand {
        /// Draft file (.json or .toml)
        draft: PathBuf,

        /// Print the events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete or edit a single occurrence of a recurring draft
    Detach {
        /// Recurring draft, or any instance generated from it (.json or .toml)
        draft: PathBuf,

        /// Occurrence to detach (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Edited copy of the occurrence; without it the occurrence is deleted
        #[arg(long)]
        edit: Option<PathBuf>,

        /// Print the updated draft and detached event as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a commented default configuration file
    InitConfig {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env().ok();
    let filter_from_env = env_filter.is_some();
    let (filter_layer, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new(BOOTSTRAP_FILTER)));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();

    match cli.command {
        Commands::InitConfig { force } => {
            commands::init_config::run(&EngineConfig::config_path()?, force)
        }
        Commands::Validate { start, end, json } => commands::validate::run(&start, &end, json),
        Commands::Expand { draft, json } => {
            let bound = apply_config(&filter_handle, filter_from_env)?;
            commands::expand::run(&draft, &bound, json)
        }
        Commands::Detach {
            draft,
            date,
            edit,
            json,
        } => {
            let bound = apply_config(&filter_handle, filter_from_env)?;
            commands::detach::run(&draft, date, edit.as_deref(), &bound, json)
        }
    }
}

/// Load the engine configuration and switch the log filter to its level,
/// unless RUST_LOG already chose one.
fn apply_config(
    filter_handle: &reload::Handle<EnvFilter, Registry>,
    filter_from_env: bool,
) -> Result<ExpansionBound> {
    let config = EngineConfig::load()?;
    tracing::debug!(config = ?config, "Configuration loaded");

    if !filter_from_env {
        match EnvFilter::try_new(config.logging.level.as_str()) {
            Ok(filter) => {
                if let Err(e) = filter_handle.modify(|current| *current = filter) {
                    tracing::warn!(error = %e, "Failed to update log filter from config");
                }
            }
            Err(_) => {
                tracing::warn!(
                    level = %config.logging.level,
                    "Invalid log level in config, keeping {BOOTSTRAP_FILTER}"
                );
            }
        }
    }

    Ok(config.expansion.bound())
}
