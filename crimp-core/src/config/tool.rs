//! Tool definitions from the catalog

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// Family of a training tool; selects the recipe table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    /// Interval and work/rest timers
    Timer,
    /// Random spoken callouts while climbing
    Callout,
    /// Movement pacing to a beat
    Metronome,
    /// Structured climbing sessions (sets, laps, pyramids...)
    Session,
}

impl ToolType {
    /// Lowercase name as used in catalogs
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::Timer => "timer",
            ToolType::Callout => "callout",
            ToolType::Metronome => "metronome",
            ToolType::Session => "session",
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool as supplied by the catalog
///
/// Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Catalog id, if the tool has been saved
    #[serde(default)]
    pub id: Option<u64>,
    /// Display name
    pub name: String,
    /// Tool family
    pub tool_type: ToolType,
    /// Encoded (JSON) default configuration
    #[serde(default)]
    pub default_config: String,
}

impl ToolDefinition {
    /// Create a definition with an empty default config
    pub fn new(name: impl Into<String>, tool_type: ToolType) -> Self {
        Self {
            id: None,
            name: name.into(),
            tool_type,
            default_config: String::new(),
        }
    }

    /// Decode the default config
    pub fn defaults(&self) -> Result<Config, ConfigError> {
        Config::from_json(&self.default_config)
    }

    /// Default config with user overrides layered on top
    pub fn resolve_config(&self, overrides: &Config) -> Result<Config, ConfigError> {
        Ok(self.defaults()?.layered(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_type_names() {
        let parsed: ToolType = serde_json::from_str("\"metronome\"").unwrap();
        assert_eq!(parsed, ToolType::Metronome);
        assert_eq!(ToolType::Session.to_string(), "session");
        assert!(serde_json::from_str::<ToolType>("\"stopwatch\"").is_err());
    }

    #[test]
    fn test_resolve_config_layers_overrides() {
        let mut tool = ToolDefinition::new("Repeaters", ToolType::Timer);
        tool.default_config = r#"{"duration": 300, "reminderInterval": 60}"#.into();
        let resolved = tool
            .resolve_config(&Config::new().with("duration", 120))
            .unwrap();
        assert_eq!(resolved.u32("duration"), Some(120));
        assert_eq!(resolved.u32("reminderInterval"), Some(60));
    }

    #[test]
    fn test_resolve_config_bad_defaults() {
        let mut tool = ToolDefinition::new("Broken", ToolType::Timer);
        tool.default_config = "not json".into();
        assert!(tool.resolve_config(&Config::new()).is_err());
    }
}
