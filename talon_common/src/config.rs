//! TOML configuration layer shared by the control binary and its tests.
//!
//! Every config struct in the workspace gets [`ConfigLoader`] for free:
//! missing keys fall back to serde defaults, so a robot file only lists what
//! differs from the built-in tuning. Loading never validates; callers run
//! their own `validate` once the whole tree is parsed, or use
//! [`ConfigLoader::load_checked`].
//!
//! ```rust,no_run
//! use std::path::Path;
//! use serde::Deserialize;
//! use talon_common::config::{ConfigError, ConfigLoader, SharedConfig};
//!
//! #[derive(Debug, Deserialize)]
//! struct BenchRig {
//!     #[serde(default)]
//!     shared: SharedConfig,
//!     period_ms: u64,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let rig = BenchRig::load_checked(Path::new("bench.toml"), |r| r.shared.validate())?;
//!     println!("{} at {} ms", rig.shared.service_name, rig.period_ms);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("config file {} not found", .0.display())]
    FileNotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("cannot read config file {}: {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },

    #[error("invalid TOML: {0}")]
    ParseError(String),

    /// Parsed, but a value is out of range or inconsistent.
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Default log verbosity, written in lowercase in TOML. `RUST_LOG` and
/// `--verbose` override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[shared]` table: identity and logging of one robot instance.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "talon-practice-bot"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name shown in logs and the status snapshot.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_service_name() -> String {
    "talon".to_string()
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// TOML loading for any deserializable config tree.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Read and parse `path`. A missing file is reported separately so the
    /// binary can say which path it looked at.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// [`ConfigLoader::load`] followed by `validate`.
    fn load_checked(
        path: &Path,
        validate: impl FnOnce(&Self) -> Result<(), ConfigError>,
    ) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        validate(&config)?;
        Ok(config)
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
