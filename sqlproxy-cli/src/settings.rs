//! Settings file resolution
//!
//! An explicit `--settings` path must exist. Without one, `sqlproxy.toml`
//! in the working directory is used when present, otherwise defaults plus
//! `SQLPROXY_*` environment overrides.

use std::fmt;
use std::path::{Path, PathBuf};

use sqlproxy_core::config::SqlProxyConfig;
use sqlproxy_core::error::SqlProxyError;

use crate::error::CliError;

/// Settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "sqlproxy.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Where effective settings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    File(PathBuf),
    Defaults,
}

impl SettingsSource {
    pub fn resolve(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => Self::File(path.to_path_buf()),
            None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => {
                Self::File(PathBuf::from(DEFAULT_SETTINGS_FILE))
            }
            None => Self::Defaults,
        }
    }

    /// Load, apply env overrides and validate.
    pub async fn load(&self) -> Result<SqlProxyConfig, SqlProxyError> {
        match self {
            Self::File(path) => SqlProxyConfig::load(path).await,
            Self::Defaults => SqlProxyConfig::from_env(),
        }
    }
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("<defaults>"),
        }
    }
}

/// Validate a `--log-level` override.
pub fn check_log_level(level: &str) -> Result<(), CliError> {
    if LOG_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(CliError::Config(format!(
            "invalid log level '{level}', must be one of: {}",
            LOG_LEVELS.join(", ")
        )))
    }
}
