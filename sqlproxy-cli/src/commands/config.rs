//! `sqlproxy-fn config` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use sqlproxy_core::config::SqlProxyConfig;
use sqlproxy_injector::ContainerPathTable;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::settings::SettingsSource;

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    source: &SettingsSource,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(source, writer).await,
        ConfigAction::Show => execute_show(source, writer).await,
    }
}

/// Load and validate the settings, reporting any error.
///
/// # Errors
///
/// Returns `CliError::Config` if the settings are invalid, after rendering the report.
async fn execute_validate(source: &SettingsSource, writer: &OutputWriter) -> Result<(), CliError> {
    info!(settings = %source, "validating settings");

    let report = match source.load().await {
        Ok(settings) => {
            settings.warn_ignored_overrides();
            ConfigValidationReport {
                source: source.to_string(),
                valid: true,
                errors: Vec::new(),
            }
        }
        Err(e) => ConfigValidationReport {
            source: source.to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("settings are invalid".to_owned()));
    }

    Ok(())
}

/// Display effective settings and the container path lookup order.
async fn execute_show(source: &SettingsSource, writer: &OutputWriter) -> Result<(), CliError> {
    info!(settings = %source, "loading settings");

    let settings = source.load().await?;
    settings.warn_ignored_overrides();
    let report = ConfigReport::new(source, settings)?;
    writer.render(&report)
}

/// Effective settings report.
///
/// `settings_toml` is only used for text rendering.
#[derive(Serialize)]
pub struct ConfigReport {
    pub source: String,
    pub settings: SqlProxyConfig,
    /// Candidate container paths in lookup order
    pub container_paths: ContainerPathTable,
    #[serde(skip)]
    pub settings_toml: String,
}

impl ConfigReport {
    pub fn new(source: &SettingsSource, settings: SqlProxyConfig) -> Result<Self, CliError> {
        let container_paths =
            ContainerPathTable::with_extra(&settings.injector.extra_container_paths).map_err(
                |invalid| {
                    CliError::Config(format!(
                        "invalid injector.extra_container_paths: {}",
                        invalid.join(", ")
                    ))
                },
            )?;
        let settings_toml = toml::to_string_pretty(&settings)
            .unwrap_or_else(|e| format!("(serialization error: {})", e));

        Ok(Self {
            source: source.to_string(),
            settings,
            container_paths,
            settings_toml,
        })
    }
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Settings (source: {})", self.source.bold())?;
        writeln!(w)?;
        write!(w, "{}", self.settings_toml)?;
        writeln!(w)?;
        writeln!(w, "Container paths (lookup order):")?;
        for (i, path) in self.container_paths.candidates().iter().enumerate() {
            writeln!(w, "  {}. {}", i + 1, path)?;
        }
        Ok(())
    }
}

/// Settings validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Settings Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
