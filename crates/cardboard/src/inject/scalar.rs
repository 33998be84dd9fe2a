//! Configuration keys and the value types configuration can be injected as.

use cardboard_config::{ConfigSource, ConfigValue};

use crate::message::colorize;

/// Where a configuration binding reads its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKey {
    path: String,
    source: Option<String>,
    colored: bool,
}

impl ConfigKey {
    /// Reads `path` from the default source.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: None,
            colored: false,
        }
    }

    /// Reads from the named source instead of the default one.
    #[must_use]
    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Translates `&` formatting codes in text values.
    #[must_use]
    pub const fn colored(mut self) -> Self {
        self.colored = true;
        self
    }

    /// Dotted path of the value.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Named source, if one was chosen.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns `true` when text values are colour-translated.
    #[must_use]
    pub const fn is_colored(&self) -> bool {
        self.colored
    }
}

/// A type a configuration value can be injected as.
///
/// Reads never fail: a missing key or a value of the wrong kind produces the
/// type's zero value.
pub trait ConfigScalar: Clone + Default + Send + Sync + 'static {
    /// Reads the value at `path`.
    fn read(source: &dyn ConfigSource, path: &str) -> Self;

    /// Applies formatting-code translation. Only text is affected.
    #[must_use]
    fn colorize(self) -> Self {
        self
    }
}

impl ConfigScalar for bool {
    fn read(source: &dyn ConfigSource, path: &str) -> Self {
        source.get_bool(path)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "narrow integer fields truncate like the host's number conversions"
)]
impl ConfigScalar for i8 {
    fn read(source: &dyn ConfigSource, path: &str) -> Self {
        source.get_int(path) as Self
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "narrow integer fields truncate like the host's number conversions"
)]
impl ConfigScalar for i16 {
    fn read(source: &dyn ConfigSource, path: &str) -> Self {
        source.get_int(path) as Self
    }
}

impl ConfigScalar for i32 {
    fn read(source: &dyn ConfigSource, path: &str) -> Self {
        source.get_int(path)
    }
}

impl ConfigScalar for i64 {
    fn read(source: &dyn ConfigSource, path: &str) -> Self {
        source.get_long(path)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "single precision fields accept the nearest representable value"
)]
impl ConfigScalar for f32 {
    fn read(source: &dyn ConfigSource, path: &str) -> Self {
        source.get_double(path) as Self
    }
}

impl ConfigScalar for f64 {
    fn read(source: &dyn ConfigSource, path: &str) -> Self {
        source.get_double(path)
    }
}

impl ConfigScalar for String {
    fn read(source: &dyn ConfigSource, path: &str) -> Self {
        source.get_string(path).unwrap_or_default()
    }

    fn colorize(self) -> Self {
        colorize(&self)
    }
}

impl ConfigScalar for Option<ConfigValue> {
    fn read(source: &dyn ConfigSource, path: &str) -> Self {
        source.lookup(path)
    }
}
