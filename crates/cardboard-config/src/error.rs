//! Errors raised while loading configuration sources.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised while reading or parsing configuration files.
///
/// Underlying errors are wrapped in `Arc` so the enum stays cheap to clone.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The configuration text is not valid YAML.
    #[error("failed to parse configuration from {origin}: {source}")]
    Parse {
        /// File path or other description of where the text came from.
        origin: String,
        /// Underlying YAML error.
        #[source]
        source: Arc<serde_yaml::Error>,
    },

    /// The document root is a scalar or list rather than a mapping.
    #[error("configuration root in {origin} must be a mapping, found {found}")]
    NotAMapping {
        /// File path or other description of where the text came from.
        origin: String,
        /// Kind of value found at the root.
        found: &'static str,
    },
}

impl ConfigError {
    /// Creates a new `Io` error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new `Parse` error.
    #[must_use]
    pub fn parse(origin: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            origin: origin.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new `NotAMapping` error.
    #[must_use]
    pub fn not_a_mapping(origin: impl Into<String>, found: &'static str) -> Self {
        Self::NotAMapping {
            origin: origin.into(),
            found,
        }
    }

    /// Returns `true` when the error means the file does not exist.
    #[must_use]
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
