//! Configuration with multi-source loading.
//!
//! Merges settings from CLI args, environment variables and an optional
//! `theme-graph.config.json`.
//! Priority: CLI > Environment > File > Defaults

mod loading;
mod tests;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use loading::{CONFIG_FILE_NAME, ConfigOverrides, ENV_PREFIX};

use crate::error::{ConfigError, Result};

/// Settings for the theme graph CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ThemeGraphConfig {
    /// Theme directory
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Explicit entry points relative to the theme root. Discovered when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_points: Option<Vec<String>>,

    /// Watch mode: milliseconds to wait for more changes before updating
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Watch mode: path patterns to ignore (`node_modules`, `*.swp`)
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

pub fn default_root() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_debounce_ms() -> u64 {
    100
}

pub fn default_ignore() -> Vec<String> {
    vec!["node_modules".to_string(), "*.swp".to_string(), "*~".to_string()]
}

impl Default for ThemeGraphConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            entry_points: None,
            debounce_ms: default_debounce_ms(),
            ignore: default_ignore(),
            pretty: false,
        }
    }
}

impl ThemeGraphConfig {
    /// Generate JSON Schema for theme-graph.config.json.
    pub fn json_schema() -> serde_json::Value {
        serde_json::Value::from(schemars::schema_for!(ThemeGraphConfig))
    }

    /// Check values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<()> {
        if let Some(entry_points) = &self.entry_points {
            if let Some(bad) = entry_points
                .iter()
                .find(|entry| entry.trim().is_empty() || Path::new(entry).is_absolute())
            {
                return Err(ConfigError::InvalidValue {
                    field: "entryPoints".to_string(),
                    value: format!("{bad:?}"),
                    hint: "Entry points are paths relative to the theme root, like templates/index.json"
                        .to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// The theme root resolved against `cwd`.
    pub fn resolved_root(&self, cwd: &Path) -> PathBuf {
        if self.root.is_absolute() {
            self.root.clone()
        } else {
            cwd.join(&self.root)
        }
    }
}
