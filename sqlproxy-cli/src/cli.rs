//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// sqlproxy-fn -- KRM function injecting a Cloud SQL proxy sidecar.
///
/// With no subcommand, reads a ResourceList from stdin and writes the
/// transformed ResourceList to stdout.
#[derive(Parser, Debug)]
#[command(name = "sqlproxy-fn", version, about, long_about = None)]
pub struct Cli {
    /// Path to the sqlproxy.toml settings file.
    ///
    /// When omitted, `sqlproxy.toml` in the working directory is used if it exists.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Report format for `preview` and `config`.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Serialization format of the emitted ResourceList.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ManifestFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the function on a ResourceList (default).
    Run(RunArgs),

    /// Write a Dockerfile packaging the function.
    Gen(GenArgs),

    /// Print the sidecar container a function config would inject.
    Preview(PreviewArgs),

    /// Manage settings.
    Config(ConfigArgs),
}

// ---- run ----

/// Transform a ResourceList.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Read the ResourceList from a file instead of stdin.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write the result to a file instead of stdout.
    #[arg(short = 'o', long)]
    pub output_file: Option<PathBuf>,

    /// Output serialization.
    #[arg(long, default_value = "yaml")]
    pub format: ManifestFormat,
}

// ---- gen ----

/// Generate a Dockerfile into a directory.
#[derive(Args, Debug)]
pub struct GenArgs {
    /// Target directory (created if missing).
    pub dir: PathBuf,
}

// ---- preview ----

/// Render the sidecar for a function config without a ResourceList.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Function config YAML file (the document with `spec.proxyImage` etc.).
    #[arg(short, long)]
    pub function_config: PathBuf,

    /// Workload kind passed to the container builder.
    #[arg(long, default_value = "Deployment")]
    pub kind: String,
}

// ---- config ----

/// Manage sqlproxy-fn settings.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the settings file and report errors.
    Validate,
    /// Show effective settings (file + env overrides + defaults) and the container path table.
    Show,
}
