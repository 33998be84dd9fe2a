//! YAML parsing into [`ConfigSection`] trees.

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::error::ConfigError;
use crate::section::{ConfigSection, ConfigValue};

impl ConfigSection {
    /// Parses a YAML document whose root is a mapping.
    ///
    /// An empty document yields an empty section. `null` values are dropped so
    /// lookups treat them as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::NotAMapping`] when the root is not a mapping.
    pub fn from_yaml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let document: Value =
            serde_yaml::from_str(text).map_err(|err| ConfigError::parse(origin, err))?;
        match convert(document) {
            None => Ok(Self::new()),
            Some(ConfigValue::Section(section)) => Ok(section),
            Some(other) => Err(ConfigError::not_a_mapping(origin, other.kind())),
        }
    }

    /// Reads and parses a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// errors of [`ConfigSection::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))?;
        Self::from_yaml_str(&text, &path.display().to_string())
    }
}

fn convert(value: Value) -> Option<ConfigValue> {
    match value {
        Value::Null => None,
        Value::Bool(flag) => Some(ConfigValue::Bool(flag)),
        Value::Number(number) => Some(convert_number(&number)),
        Value::String(text) => Some(ConfigValue::String(text)),
        Value::Sequence(items) => Some(ConfigValue::List(
            items.into_iter().filter_map(convert).collect(),
        )),
        Value::Mapping(mapping) => {
            let mut section = ConfigSection::new();
            for (key, entry) in mapping {
                let (Some(name), Some(converted)) = (key_name(&key), convert(entry)) else {
                    continue;
                };
                section.insert_entry(name, converted);
            }
            Some(ConfigValue::Section(section))
        }
        Value::Tagged(tagged) => convert(tagged.value),
    }
}

fn convert_number(number: &serde_yaml::Number) -> ConfigValue {
    if let Some(value) = number.as_i64() {
        return ConfigValue::Integer(value);
    }
    ConfigValue::Float(number.as_f64().unwrap_or_default())
}

fn key_name(key: &Value) -> Option<String> {
    match key {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
