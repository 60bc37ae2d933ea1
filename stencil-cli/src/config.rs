//! Plugin configuration
//!
//! ```json
//! { "plugins": [ { "id": "markup", "prefix": "mk", "enabled": true } ] }
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use stencil::{EnabledTags, Stencil};
use stencil_core::{Result, StencilError};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub plugins: Vec<PluginEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginEntry {
    pub id: String,
    pub prefix: String,
    /// Whether the plugin's tags render; its filters are always available
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            StencilError::config_error(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Environment with standard filters plus every configured plugin.
    /// Returns the register naming the tags of enabled plugins.
    pub fn build(&self) -> Result<(Stencil, EnabledTags)> {
        let mut stencil = Stencil::with_standard_filters();
        let mut enabled = EnabledTags::new();

        for entry in &self.plugins {
            let plugin = stencil_std::find_plugin(&entry.id).ok_or_else(|| {
                let known: Vec<&str> = stencil_std::standard_plugins().iter().map(|p| p.meta().id).collect();
                StencilError::config_error(format!("unknown plugin '{}'", entry.id))
                    .with_suggestion(format!("Available: {}", known.join(", ")))
            })?;

            let registration = stencil.register_plugin(plugin.as_ref(), &entry.prefix)?;
            info!(
                plugin = %registration.plugin,
                prefix = %registration.prefix,
                filters = registration.filters.len(),
                tags = registration.tags.len(),
                enabled = entry.enabled,
                "plugin loaded"
            );
            if entry.enabled {
                enabled.extend(registration.tags);
            }
        }

        Ok((stencil, enabled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::codes;

    #[test]
    fn test_defaults() {
        let config = Config::parse("{}").unwrap();
        assert!(config.plugins.is_empty());

        let config = Config::parse(r#"{"plugins":[{"id":"url","prefix":"u"}]}"#).unwrap();
        assert!(config.plugins[0].enabled);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = Config::parse(r#"{"plugins":[{"id":"url","prefix":"u","enable":false}]}"#).unwrap_err();
        assert_eq!(err.code, codes::CONFIG_ERROR);
    }

    #[test]
    fn test_build_enables_only_enabled_plugins() {
        let config = Config::parse(
            r#"{"plugins":[
                {"id":"markup","prefix":"on","enabled":true},
                {"id":"markup","prefix":"off","enabled":false}
            ]}"#,
        )
        .unwrap();
        let (stencil, enabled) = config.build().unwrap();

        assert!(enabled.is_enabled("on_paragraph"));
        assert!(!enabled.is_enabled("off_paragraph"));
        assert!(stencil.tag_names().contains(&"off_paragraph"));
        assert!(stencil.filter_names().contains(&"off_add_newline"));
    }

    #[test]
    fn test_build_unknown_plugin() {
        let config = Config::parse(r#"{"plugins":[{"id":"nope","prefix":"n"}]}"#).unwrap();
        let err = config.build().unwrap_err();
        assert_eq!(err.code, codes::CONFIG_ERROR);
        assert!(err.suggestion.unwrap().contains("markup"));
    }

    #[test]
    fn test_build_repeated_prefix() {
        let config = Config::parse(
            r#"{"plugins":[{"id":"url","prefix":"x"},{"id":"markup","prefix":"x"}]}"#,
        )
        .unwrap();
        let err = config.build().unwrap_err();
        assert_eq!(err.code, codes::DUPLICATE_NAME);
    }

    #[test]
    fn test_build_bad_prefix() {
        let config = Config::parse(r#"{"plugins":[{"id":"url","prefix":"9x"}]}"#).unwrap();
        assert_eq!(config.build().unwrap_err().code, codes::INVALID_PREFIX);
    }
}
