#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::error::CliError;
    use serial_test::serial;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, contents).unwrap();
        (temp, path)
    }

    #[test]
    fn test_serialization() {
        let config = ThemeGraphConfig {
            root: PathBuf::from("themes/dawn"),
            entry_points: Some(vec!["templates/index.json".to_string()]),
            debounce_ms: 250,
            ignore: vec!["node_modules".to_string()],
            pretty: true,
        };

        let json_val = serde_json::to_value(&config).unwrap();
        assert!(json_val.get("entryPoints").is_some());
        assert!(json_val.get("debounceMs").is_some());
        assert!(json_val.get("debounce_ms").is_none());

        let deserialized: ThemeGraphConfig = serde_json::from_value(json_val).unwrap();
        assert_eq!(deserialized, config);

        let minimal = serde_json::to_value(ThemeGraphConfig::default()).unwrap();
        assert!(minimal.get("entryPoints").is_none());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<ThemeGraphConfig, _> = serde_json::from_str(r#"{"rooot": "."}"#);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_defaults_without_sources() {
        let config = ThemeGraphConfig::load(&ConfigOverrides::default(), None).unwrap();
        assert_eq!(config, ThemeGraphConfig::default());
    }

    #[test]
    #[serial]
    fn test_file_values_are_loaded() {
        let (_temp, path) = write_config(
            r#"{
                "root": "shop",
                "entryPoints": ["templates/index.json"],
                "debounceMs": 40,
                "pretty": true
            }"#,
        );

        let config = ThemeGraphConfig::load(&ConfigOverrides::default(), Some(&path)).unwrap();

        assert_eq!(config.root, PathBuf::from("shop"));
        assert_eq!(config.entry_points, Some(vec!["templates/index.json".to_string()]));
        assert_eq!(config.debounce_ms, 40);
        assert!(config.pretty);
        assert_eq!(config.ignore, default_ignore());
    }

    #[test]
    #[serial]
    fn test_cli_overrides_file() {
        let (_temp, path) = write_config(r#"{ "root": "from-file", "debounceMs": 40 }"#);
        let overrides = ConfigOverrides {
            root: Some(PathBuf::from("from-cli")),
            ..ConfigOverrides::default()
        }
        .with_debounce_ms(Some(500));

        let config = ThemeGraphConfig::load(&overrides, Some(&path)).unwrap();

        assert_eq!(config.root, PathBuf::from("from-cli"));
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    #[serial]
    fn test_unset_overrides_keep_file_values() {
        let (_temp, path) = write_config(r#"{ "pretty": true }"#);
        let overrides = ConfigOverrides::default().with_pretty(false);

        let config = ThemeGraphConfig::load(&overrides, Some(&path)).unwrap();

        assert!(config.pretty);
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let (_temp, path) = write_config(r#"{ "debounceMs": 40, "root": "from-file" }"#);
        unsafe {
            std::env::set_var("THEME_GRAPH_DEBOUNCE_MS", "750");
        }

        let config = ThemeGraphConfig::load(&ConfigOverrides::default(), Some(&path));

        unsafe {
            std::env::remove_var("THEME_GRAPH_DEBOUNCE_MS");
        }
        let config = config.unwrap();
        assert_eq!(config.debounce_ms, 750);
        assert_eq!(config.root, PathBuf::from("from-file"));
    }

    #[test]
    #[serial]
    fn test_missing_explicit_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.json");

        let err = ThemeGraphConfig::load(&ConfigOverrides::default(), Some(&path)).unwrap_err();

        assert!(matches!(err, CliError::Config(crate::error::ConfigError::NotFound(_))));
    }

    #[test]
    #[serial]
    fn test_invalid_field_type() {
        let (_temp, path) = write_config(r#"{ "debounceMs": "soon" }"#);

        let err = ThemeGraphConfig::load(&ConfigOverrides::default(), Some(&path)).unwrap_err();

        assert!(err.to_string().contains("debounceMs"));
    }

    #[test]
    fn test_validation_rejects_absolute_entry_points() {
        let config = ThemeGraphConfig {
            entry_points: Some(vec!["/etc/passwd".to_string()]),
            ..ThemeGraphConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ThemeGraphConfig {
            entry_points: Some(vec!["templates/index.json".to_string()]),
            ..ThemeGraphConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolved_root() {
        let config = ThemeGraphConfig {
            root: PathBuf::from("shop"),
            ..ThemeGraphConfig::default()
        };
        assert_eq!(config.resolved_root(&PathBuf::from("/work")), PathBuf::from("/work/shop"));

        let config = ThemeGraphConfig {
            root: PathBuf::from("/abs/shop"),
            ..ThemeGraphConfig::default()
        };
        assert_eq!(config.resolved_root(&PathBuf::from("/work")), PathBuf::from("/abs/shop"));
    }

    #[test]
    fn test_json_schema_lists_fields() {
        let schema = ThemeGraphConfig::json_schema();
        let properties = schema.get("properties").unwrap();
        assert!(properties.get("root").is_some());
        assert!(properties.get("entryPoints").is_some());
        assert!(properties.get("debounceMs").is_some());
    }
}
