//! `sqlproxy-fn preview` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use sqlproxy_core::node::ManifestNode;
use sqlproxy_injector::{ProxyConfig, build_sidecar};

use crate::cli::PreviewArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `preview` command.
pub async fn execute(args: PreviewArgs, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %args.function_config.display(), "reading function config");

    let content = tokio::fs::read_to_string(&args.function_config).await?;
    let report = preview(&content, &args.kind)?;
    writer.render(&report)
}

/// Build the sidecar a function config would produce for `kind`.
pub fn preview(function_config: &str, kind: &str) -> Result<PreviewReport, CliError> {
    let node = ManifestNode::from_yaml_str(function_config)
        .map_err(|e| CliError::Config(format!("invalid function config: {e}")))?;
    let config = ProxyConfig::from_function_config(&node)?;
    let container = build_sidecar(&config, kind).map_err(|e| CliError::Command(e.to_string()))?;

    Ok(PreviewReport {
        kind: kind.to_owned(),
        config,
        container,
    })
}

/// Sidecar preview report.
#[derive(Debug, Serialize)]
pub struct PreviewReport {
    pub kind: String,
    pub config: ProxyConfig,
    pub container: ManifestNode,
}

impl Render for PreviewReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Sidecar for {} (image: {})", self.kind.bold(), self.config.image())?;
        writeln!(w)?;
        let yaml = serde_yaml::to_string(&self.container).map_err(std::io::Error::other)?;
        write!(w, "{yaml}")
    }
}
