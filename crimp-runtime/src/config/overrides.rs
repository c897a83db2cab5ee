//! `--set key=value` overrides

use serde_json::Value;

use crimp_core::config::Config;

use super::CatalogError;

/// Build an override config from `key=value` pairs
///
/// Values are read as JSON when they parse (`5`, `true`, `[1,2]`, `null`)
/// and as plain strings otherwise. Later pairs win.
pub fn parse_overrides<S: AsRef<str>>(pairs: &[S]) -> Result<Config, CatalogError> {
    let mut config = Config::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(CatalogError::BadOverride(pair.to_owned()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CatalogError::BadOverride(pair.to_owned()));
        }
        let value = serde_json::from_str::<Value>(raw.trim())
            .unwrap_or_else(|_| Value::String(raw.to_owned()));
        config.set(key, value);
    }
    Ok(config)
}
