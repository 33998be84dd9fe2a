//! Configuration sources for Cardboard components.
//!
//! Components read their settings through the [`ConfigSource`] trait: a keyed
//! lookup over dotted paths (`shop.greeting`) with typed getters that return
//! a zero value instead of failing when a key is missing or holds a value of
//! the wrong shape. The crate ships one implementation, [`ConfigSection`], a
//! tree of [`ConfigValue`]s usually parsed from YAML.
//!
//! [`ConfigStore`] owns the default source plus any number of named alternate
//! sources. Named sources that were not registered up front are loaded from
//! YAML files relative to the store's data directory the first time they are
//! requested, then cached for the rest of the run.
//!
//! The crate also carries the telemetry settings shared by hosts:
//! [`TelemetrySettings`] and [`LogFormat`].

mod defaults;
mod error;
mod logging;
mod section;
mod source;
mod store;
mod yaml;

pub use defaults::{
    DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string,
    default_log_format,
};
pub use error::ConfigError;
pub use logging::{LogFormat, LogFormatParseError, TelemetrySettings};
pub use section::{ConfigSection, ConfigValue};
pub use source::ConfigSource;
pub use store::ConfigStore;

#[cfg(test)]
mod tests;
