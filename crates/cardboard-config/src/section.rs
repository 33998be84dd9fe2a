//! In-memory configuration trees addressed by dotted paths.

use std::collections::BTreeMap;
use std::fmt;

use crate::source::ConfigSource;

const PATH_SEPARATOR: char = '.';

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Boolean flag.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    String(String),
    /// Ordered list of values.
    List(Vec<ConfigValue>),
    /// Nested section.
    Section(ConfigSection),
}

impl ConfigValue {
    /// Human-readable name of the value's kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Section(_) => "section",
        }
    }

    /// Returns the nested section when this value is one.
    #[must_use]
    pub const fn as_section(&self) -> Option<&ConfigSection> {
        match self {
            Self::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Renders scalar values as text. Lists and sections have no text form.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Bool(value) => Some(value.to_string()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::String(value) => Some(value.clone()),
            Self::List(_) | Self::Section(_) => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => {
                f.write_str("[")?;
                for (position, item) in items.iter().enumerate() {
                    if position > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Section(section) => write!(f, "<section with {} keys>", section.len()),
            scalar => f.write_str(&scalar.to_text().unwrap_or_default()),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ConfigSection> for ConfigValue {
    fn from(value: ConfigSection) -> Self {
        Self::Section(value)
    }
}

/// A tree of configuration values keyed by name.
///
/// Paths such as `shop.prices.apple` walk nested sections one segment at a
/// time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSection {
    entries: BTreeMap<String, ConfigValue>,
}

impl ConfigSection {
    /// Creates an empty section.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the section has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the direct children in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Looks up the value at a dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.entries.get(first)?;
        for segment in segments {
            current = current.as_section()?.entries.get(segment)?;
        }
        Some(current)
    }

    /// Stores a value at a dotted path, creating intermediate sections.
    ///
    /// Intermediate values that are not sections are replaced.
    pub fn set(&mut self, path: &str, value: ConfigValue) {
        match path.split_once(PATH_SEPARATOR) {
            None => {
                self.entries.insert(path.to_owned(), value);
            }
            Some((head, rest)) => {
                let child = self
                    .entries
                    .entry(head.to_owned())
                    .or_insert_with(|| ConfigValue::Section(Self::new()));
                if !matches!(child, ConfigValue::Section(_)) {
                    *child = ConfigValue::Section(Self::new());
                }
                if let ConfigValue::Section(section) = child {
                    section.set(rest, value);
                }
            }
        }
    }

    /// Inserts a direct child without splitting the key on dots.
    pub(crate) fn insert_entry(&mut self, key: String, value: ConfigValue) {
        self.entries.insert(key, value);
    }

    /// Builder-style variant of [`ConfigSection::set`].
    #[must_use]
    pub fn with(mut self, path: &str, value: impl Into<ConfigValue>) -> Self {
        self.set(path, value.into());
        self
    }

    /// Returns the nested section at a dotted path.
    #[must_use]
    pub fn section(&self, path: &str) -> Option<&Self> {
        self.get(path).and_then(ConfigValue::as_section)
    }
}

impl ConfigSource for ConfigSection {
    fn lookup(&self, path: &str) -> Option<ConfigValue> {
        self.get(path).cloned()
    }
}
