//! Configuration
//!
//! Tool configs are schema-free key/value maps. Recipes look for the keys
//! they need instead of deserializing into a fixed shape, so this module
//! offers a permissive map with typed accessors rather than structs.

pub mod map;
pub mod settings;
pub mod tool;

pub use map::{value_as_u32, Config};
pub use settings::{EngineSettings, MilestoneThreshold};
pub use tool::{ToolDefinition, ToolType};

/// Errors decoding an encoded tool config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The text is not JSON
    #[error("config is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    /// The JSON is valid but is not an object
    #[error("config must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}
