//! The read interface components use to query configuration.

use crate::section::ConfigValue;

/// A keyed configuration source.
///
/// Only [`ConfigSource::lookup`] is required. The typed getters follow the
/// lenient conventions plugin hosts expect: a missing key or a value of the
/// wrong kind yields the type's zero value (or `None` for text) rather than an
/// error. Numeric getters narrow and widen between integer and floating point
/// values.
pub trait ConfigSource: Send + Sync {
    /// Returns the raw value at a dotted path.
    fn lookup(&self, path: &str) -> Option<ConfigValue>;

    /// Returns `true` when a value exists at the path.
    fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Reads a boolean. Anything other than a boolean `true` is `false`.
    fn get_bool(&self, path: &str) -> bool {
        matches!(self.lookup(path), Some(ConfigValue::Bool(true)))
    }

    /// Reads a 32-bit integer.
    ///
    /// Wider integers wrap and floats truncate toward zero.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "narrowing mirrors the host configuration API"
    )]
    fn get_int(&self, path: &str) -> i32 {
        match self.lookup(path) {
            Some(ConfigValue::Integer(value)) => value as i32,
            Some(ConfigValue::Float(value)) => value as i32,
            _ => 0,
        }
    }

    /// Reads a 64-bit integer. Floats truncate toward zero.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "narrowing mirrors the host configuration API"
    )]
    fn get_long(&self, path: &str) -> i64 {
        match self.lookup(path) {
            Some(ConfigValue::Integer(value)) => value,
            Some(ConfigValue::Float(value)) => value as i64,
            _ => 0,
        }
    }

    /// Reads a floating point number. Integers widen.
    #[expect(
        clippy::cast_precision_loss,
        reason = "integers beyond 2^53 are not meaningful configuration values"
    )]
    fn get_double(&self, path: &str) -> f64 {
        match self.lookup(path) {
            Some(ConfigValue::Integer(value)) => value as f64,
            Some(ConfigValue::Float(value)) => value,
            _ => 0.0,
        }
    }

    /// Reads a scalar rendered as text.
    fn get_string(&self, path: &str) -> Option<String> {
        self.lookup(path).as_ref().and_then(ConfigValue::to_text)
    }
}
