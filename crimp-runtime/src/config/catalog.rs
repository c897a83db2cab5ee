//! Tool catalog

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crimp_core::config::{ConfigError, EngineSettings, ToolDefinition};

/// Default catalog, compiled in
pub const EMBEDDED_CATALOG: &str = include_str!("../../tools.toml");

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("tool #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("tool '{0}' is defined more than once")]
    DuplicateTool(String),

    #[error("default_config of tool '{name}' is invalid: {source}")]
    BadDefaults {
        name: String,
        #[source]
        source: ConfigError,
    },

    #[error("no tool named '{0}' in the catalog")]
    UnknownTool(String),

    #[error("bad override '{0}': expected key=value")]
    BadOverride(String),
}

/// Parsed catalog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    /// Scheduler tuning
    #[serde(default)]
    pub settings: EngineSettings,
    #[serde(default, rename = "tool")]
    pub tools: Vec<ToolDefinition>,
}

impl Catalog {
    /// Parse and validate catalog text
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The compiled-in catalog
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::parse(EMBEDDED_CATALOG)
    }

    /// Load from `path`, or the compiled-in catalog when `None`
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(path) => {
                info!(path = %path.display(), "loading catalog");
                let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::parse(&text)?
            }
            None => {
                debug!("using embedded catalog");
                Self::embedded()?
            }
        };
        log_catalog_summary(&catalog);
        Ok(catalog)
    }

    /// Find a tool by name, ignoring case
    pub fn find(&self, name: &str) -> Result<&ToolDefinition, CatalogError> {
        let wanted = name.trim();
        self.tools
            .iter()
            .find(|tool| tool.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownTool(wanted.to_owned()))
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen: Vec<String> = Vec::with_capacity(self.tools.len());
        for (index, tool) in self.tools.iter().enumerate() {
            let name = tool.name.trim();
            if name.is_empty() {
                return Err(CatalogError::EmptyName { index });
            }
            let key = name.to_ascii_lowercase();
            if seen.contains(&key) {
                return Err(CatalogError::DuplicateTool(name.to_owned()));
            }
            seen.push(key);

            tool.defaults().map_err(|source| CatalogError::BadDefaults {
                name: name.to_owned(),
                source,
            })?;
        }
        Ok(())
    }
}

fn log_catalog_summary(catalog: &Catalog) {
    info!(tools = catalog.tools.len(), "catalog loaded");
    for tool in &catalog.tools {
        debug!(name = %tool.name, tool_type = %tool.tool_type, "  tool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crimp_core::compiler::compile;
    use crimp_core::config::ToolType;

    #[test]
    fn test_embedded_catalog_compiles() {
        let catalog = Catalog::embedded().unwrap();
        assert!(!catalog.tools.is_empty());
        for tool in &catalog.tools {
            let config = tool.defaults().unwrap();
            let program = compile(tool, &config);
            assert!(
                program.diagnostics.is_empty(),
                "{} fell back: {:?}",
                tool.name,
                program.diagnostics
            );
        }
    }

    #[test]
    fn test_find_ignores_case() {
        let catalog = Catalog::embedded().unwrap();
        let tool = catalog.find("  repeaters ").unwrap();
        assert_eq!(tool.tool_type, ToolType::Timer);
        assert!(matches!(
            catalog.find("Campus Ladder"),
            Err(CatalogError::UnknownTool(_))
        ));
    }

    #[test]
    fn test_settings_default_when_missing() {
        let catalog = Catalog::parse(
            r#"
            [[tool]]
            name = "Block"
            tool_type = "session"
            default_config = '{"duration": 60}'
            "#,
        )
        .unwrap();
        assert_eq!(catalog.settings, EngineSettings::default());
        assert_eq!(catalog.tools[0].id, None);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let text = r#"
            [[tool]]
            name = "Block"
            tool_type = "session"

            [[tool]]
            name = "BLOCK"
            tool_type = "timer"
        "#;
        assert!(matches!(
            Catalog::parse(text),
            Err(CatalogError::DuplicateTool(_))
        ));
    }

    #[test]
    fn test_bad_default_config_rejected() {
        let text = r#"
            [[tool]]
            name = "Broken"
            tool_type = "timer"
            default_config = '[1, 2]'
        "#;
        assert!(matches!(
            Catalog::parse(text),
            Err(CatalogError::BadDefaults { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.toml");
        fs::write(
            &path,
            "[settings]\nearly_exit_threshold_s = 20\n\n[[tool]]\nname = \"Hang\"\ntool_type = \"timer\"\ndefault_config = '{\"duration\": 10}'\n",
        )
        .unwrap();
        let catalog = Catalog::load(Some(&path)).unwrap();
        assert_eq!(catalog.settings.early_exit_threshold_s, 20);
        assert_eq!(catalog.tools.len(), 1);

        let missing = Catalog::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(missing, Err(CatalogError::Io { .. })));
    }
}
