//! Schema-free configuration map

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ConfigError;

/// A tool configuration
///
/// Keys keep their insertion order, which matters for callout pools.
/// A key holding JSON `null` is treated as absent everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    /// Create an empty config
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Decode an encoded config
    ///
    /// Blank input decodes to an empty config.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(Self::new());
        }
        Self::from_value(serde_json::from_str(input)?)
    }

    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConfigError::NotAnObject(kind_name(&other))),
        }
    }

    /// View a nested JSON object (an exercise, a phase) as a config
    pub fn view(value: &Value) -> Option<Self> {
        value.as_object().map(|m| Self(m.clone()))
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a key
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    /// Raw value for `key`, ignoring `null`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Whether `key` is present and not `null`
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether every key in `keys` is present
    pub fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|k| self.has(k))
    }

    /// Non-negative integer value
    pub fn u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(value_as_u32)
    }

    /// Non-negative integer value with a default
    pub fn u32_or(&self, key: &str, default: u32) -> u32 {
        self.u32(key).unwrap_or(default)
    }

    /// String value
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Boolean value
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Array value
    pub fn array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    /// Object value
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// Layer `overrides` on top of this config
    ///
    /// Override keys replace base keys one by one. An override set to
    /// `null` deletes the key from the result.
    pub fn layered(&self, overrides: &Config) -> Config {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            if value.is_null() {
                merged.remove(key);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }
        Config(merged)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the config has no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate keys and values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Config {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Read a JSON value as a non-negative whole number
///
/// Accepts integers, floats (rounded) and numeric strings, since config
/// edits coming from form inputs are often strings. Negatives clamp to 0.
pub fn value_as_u32(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, u32::MAX as f64) as u32)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
