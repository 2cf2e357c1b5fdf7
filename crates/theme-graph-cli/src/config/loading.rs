use crate::cli::ThemeArgs;
use crate::config::ThemeGraphConfig;
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the current directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "theme-graph.config.json";

/// Prefix of the environment variables that override config values
/// (`THEME_GRAPH_ROOT`, `THEME_GRAPH_DEBOUNCE_MS`, `THEME_GRAPH_PRETTY`).
pub const ENV_PREFIX: &str = "THEME_GRAPH_";

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

impl ConfigOverrides {
    pub fn from_theme_args(args: &ThemeArgs) -> Self {
        Self {
            root: args.root.clone(),
            entry_points: (!args.entry_points.is_empty()).then(|| args.entry_points.clone()),
            ..Self::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        if pretty {
            self.pretty = Some(true);
        }
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: Option<u64>) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }
}

/// `THEME_GRAPH_*` variables, with keys renamed to the config file's spelling.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .only(&["root", "debounce_ms", "pretty"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "debounce_ms" => "debounceMs".into(),
            other => other.to_string().into(),
        })
        .lowercase(false)
}

impl ThemeGraphConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI args > environment variables > config file > defaults
    ///
    /// Without an explicit `config_path`, `theme-graph.config.json` in the
    /// current directory is used if it exists. A relative `root` is resolved
    /// against the current directory.
    pub fn load(overrides: &ConfigOverrides, config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        figment = figment.merge(env_provider());
        figment = figment.merge(Serialized::defaults(overrides));

        let config: Self = figment.extract().map_err(|e| {
            let field = if e.path.is_empty() {
                "configuration".to_string()
            } else {
                e.path.join(".")
            };
            ConfigError::InvalidValue {
                field,
                value: e.to_string(),
                hint: format!("Check {CONFIG_FILE_NAME} syntax and field types"),
            }
        })?;

        config.validate()?;
        Ok(config)
    }
}
