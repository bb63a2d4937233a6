//! `sqlproxy-fn run` command handler (also the default with no subcommand)
//!
//! Reads a ResourceList, injects the proxy sidecar into annotated documents
//! and writes the ResourceList back. Nothing is written when any step fails.

use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::info;

use sqlproxy_core::config::SqlProxyConfig;
use sqlproxy_core::pipeline::ResourceFilter;
use sqlproxy_injector::{ContainerPathTable, ResourceList, SidecarInjectorBuilder};

use crate::cli::{ManifestFormat, RunArgs};
use crate::error::CliError;

/// Execute the `run` command.
pub async fn execute(args: RunArgs, settings: &SqlProxyConfig) -> Result<(), CliError> {
    let input = read_input(args.input.as_deref()).await?;
    let output = transform(&input, settings, args.format)?;
    write_output(args.output_file.as_deref(), &output).await
}

/// Transform a serialized ResourceList into its serialized result.
///
/// The function config is read before any document is touched, so a
/// configuration error always wins over a document error.
pub fn transform(
    input: &str,
    settings: &SqlProxyConfig,
    format: ManifestFormat,
) -> Result<String, CliError> {
    let paths = ContainerPathTable::with_extra(&settings.injector.extra_container_paths)
        .map_err(|invalid| {
            CliError::Config(format!(
                "invalid injector.extra_container_paths: {}",
                invalid.join(", ")
            ))
        })?;

    let mut list = ResourceList::from_yaml_str(input)?;

    let mut builder = SidecarInjectorBuilder::new().paths(paths);
    if let Some(function_config) = list.function_config() {
        builder = builder.function_config(function_config)?;
    }
    let injector = builder.build()?;

    let items = list.take_items();
    info!(filter = injector.name(), items = items.len(), "running filter");
    let items = injector.filter(items)?;
    list.set_items(items);

    let serialized = match format {
        ManifestFormat::Yaml => list.to_yaml_string()?,
        ManifestFormat::Json => list.to_json_string()?,
    };
    Ok(serialized)
}

async fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            Ok(buf)
        }
    }
}

async fn write_output(path: Option<&Path>, output: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            tokio::fs::write(path, output).await?;
            info!(path = %path.display(), "wrote ResourceList");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(output.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
