//! sqlproxy-fn -- KRM function injecting a Cloud SQL proxy sidecar.
//!
//! Entry point: parses CLI arguments, resolves settings, initializes
//! logging and dispatches to subcommand handlers. Errors are printed to
//! stderr and mapped to exit codes via [`CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod settings;

use std::process::ExitCode;

use clap::Parser;

use sqlproxy_core::config::{GeneralConfig, SqlProxyConfig};

use crate::cli::{Cli, Commands, RunArgs};
use crate::error::CliError;
use crate::output::OutputWriter;
use crate::settings::SettingsSource;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let source = SettingsSource::resolve(cli.settings.as_deref());
    let writer = OutputWriter::new(cli.output);
    let log_level = cli.log_level.as_deref();

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        // `config` reports settings problems itself, so logging starts from defaults.
        Commands::Config(args) => {
            init_logging(GeneralConfig::default(), log_level)?;
            commands::config::execute(args, &source, &writer).await
        }
        Commands::Run(args) => {
            let settings = load_settings(&source, log_level).await?;
            commands::run::execute(args, &settings).await
        }
        Commands::Gen(args) => {
            load_settings(&source, log_level).await?;
            commands::dockerfile::execute(args, &writer).await
        }
        Commands::Preview(args) => {
            load_settings(&source, log_level).await?;
            commands::preview::execute(args, &writer).await
        }
    }
}

/// Load settings and initialize logging from them.
async fn load_settings(
    source: &SettingsSource,
    log_level: Option<&str>,
) -> Result<SqlProxyConfig, CliError> {
    let settings = source.load().await?;
    init_logging(settings.general.clone(), log_level)?;
    settings.warn_ignored_overrides();
    tracing::debug!(settings = %source, "settings loaded");
    Ok(settings)
}

fn init_logging(mut general: GeneralConfig, log_level: Option<&str>) -> Result<(), CliError> {
    if let Some(level) = log_level {
        settings::check_log_level(level)?;
        general.log_level = level.to_owned();
    }
    logging::init_tracing(&general)
}
