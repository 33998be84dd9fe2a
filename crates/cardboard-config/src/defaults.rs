/// Name of the default configuration source.
///
/// Requests for this name (compared case-insensitively) are served by the
/// store's default source rather than a separately loaded file.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Default log filter expression used by hosts.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by hosts.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned copy of the default log filter.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for hosts.
#[must_use]
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}
