//! `sqlproxy-fn gen` command handler
//!
//! Writes a Dockerfile that builds and packages the function so it can be
//! referenced from a kustomize `config.kubernetes.io/function` annotation.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::cli::GenArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Generated file name inside the target directory.
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// Multi-stage build: release binary in a rust image, distroless runtime.
pub const DOCKERFILE: &str = r#"FROM rust:1 AS builder
WORKDIR /src
COPY . .
RUN cargo build --release --locked --bin sqlproxy-fn

FROM gcr.io/distroless/cc
COPY --from=builder /src/target/release/sqlproxy-fn /usr/local/bin/sqlproxy-fn
ENTRYPOINT ["/usr/local/bin/sqlproxy-fn"]
"#;

/// Execute the `gen` command.
pub async fn execute(args: GenArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let path = write_dockerfile(&args.dir).await?;
    writer.render(&GenReport {
        path: path.display().to_string(),
    })
}

/// Create `dir` if needed and write the Dockerfile into it, replacing any existing one.
pub async fn write_dockerfile(dir: &Path) -> Result<PathBuf, CliError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(DOCKERFILE_NAME);
    tokio::fs::write(&path, DOCKERFILE).await?;
    info!(path = %path.display(), "generated Dockerfile");
    Ok(path)
}

/// Result of the `gen` command.
#[derive(Serialize)]
pub struct GenReport {
    pub path: String,
}

impl Render for GenReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Wrote {}", self.path.bold())
    }
}
