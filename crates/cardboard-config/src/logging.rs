use std::str::FromStr;

use strum::{Display, EnumString};

use crate::defaults::{default_log_filter_string, default_log_format};
use crate::source::ConfigSource;

/// Supported logging output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    #[default]
    Json,
    /// Human-readable single line output.
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;

/// Logging settings read from the host's default configuration source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySettings {
    /// `tracing-subscriber` filter directive, e.g. `info,cardboard=debug`.
    pub log_filter: String,
    /// Output format for log records.
    pub log_format: LogFormat,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl TelemetrySettings {
    /// Path of the filter directive in the configuration source.
    pub const FILTER_PATH: &'static str = "logging.filter";
    /// Path of the output format in the configuration source.
    pub const FORMAT_PATH: &'static str = "logging.format";

    /// Reads telemetry settings, falling back to the defaults for missing,
    /// blank, or unparseable values.
    #[must_use]
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let log_filter = source
            .get_string(Self::FILTER_PATH)
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(default_log_filter_string);
        let log_format = source
            .get_string(Self::FORMAT_PATH)
            .and_then(|format| LogFormat::from_str(format.trim()).ok())
            .unwrap_or_else(default_log_format);
        Self {
            log_filter,
            log_format,
        }
    }

    /// Returns the configured filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
