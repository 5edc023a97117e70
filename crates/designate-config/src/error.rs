//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Why configuration could not be loaded.
///
/// Unknown keys surface as [`TomlError`](Self::TomlError) or
/// [`JsonError`](Self::JsonError); every section denies unknown fields.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("config file {path} does not exist")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read config file {path}")]
    Read {
        /// File path.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML.
    #[error("invalid TOML config: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Malformed JSON.
    #[error("invalid JSON config: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A value parsed but failed validation.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted key, e.g. `service_api.maintenance-mode-role`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `PREFIX__SECTION__KEY` override has an unusable value.
    #[error("environment override {var}: {reason}")]
    EnvOverride {
        /// Variable name.
        var: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `.env` file exists but is malformed.
    #[error("cannot load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// Neither `.toml` nor `.json`.
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

impl ConfigError {
    /// Creates a [`FileNotFound`](Self::FileNotFound) error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a [`Read`](Self::Read) error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`EnvOverride`](Self::EnvOverride) error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvOverride {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
