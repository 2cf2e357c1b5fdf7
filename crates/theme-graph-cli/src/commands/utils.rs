//! Shared setup for commands: configuration, theme root and graph building.

use crate::cli::ThemeArgs;
use crate::config::{ConfigOverrides, ThemeGraphConfig};
use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use std::path::{Path, PathBuf};
use std::time::Instant;
use theme_graph::{NativeFileSystem, ThemeDependencies, ThemeGraph, Uri, build};

/// A theme directory on disk, ready to be graphed.
#[derive(Debug)]
pub(crate) struct Theme {
    pub config: ThemeGraphConfig,
    /// Canonical theme directory
    pub root: PathBuf,
    pub root_uri: Uri,
    pub deps: ThemeDependencies<NativeFileSystem>,
}

impl Theme {
    /// Load the configuration and locate the theme root.
    pub fn load(args: &ThemeArgs, overrides: ConfigOverrides) -> Result<Self> {
        let config = ThemeGraphConfig::load(&overrides, args.config.as_deref())?;
        let cwd = std::env::current_dir()?;
        let root = theme_root(&config.resolved_root(&cwd))?;
        let root_uri = Uri::from_path(&root).map_err(theme_graph::GraphError::from)?;
        let deps = ThemeDependencies::new(root_uri.clone(), NativeFileSystem::new());

        tracing::debug!(root = %root_uri, "loaded theme");
        Ok(Self {
            config,
            root,
            root_uri,
            deps,
        })
    }

    /// Configured entry points as URIs, if any were configured.
    pub fn entry_points(&self) -> Option<Vec<Uri>> {
        self.config
            .entry_points
            .as_ref()
            .map(|entries| entries.iter().map(|entry| self.root_uri.join(entry)).collect())
    }

    /// Build the graph with a spinner and a summary on stderr.
    pub async fn build(&self) -> ThemeGraph {
        let spinner = ui::Spinner::new("Building theme graph...");
        let started = Instant::now();

        let graph = build(self.root_uri.clone(), &self.deps, self.entry_points()).await;

        spinner.finish("Built theme graph");
        ui::print_graph_summary(&graph, started.elapsed());
        graph
    }
}

/// Canonicalize `path` and check that it is a directory.
pub(crate) fn theme_root(path: &Path) -> Result<PathBuf> {
    let root = std::fs::canonicalize(path).with_path(path)?;
    if !root.is_dir() {
        return Err(CliError::NotADirectory(root));
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_theme_root_must_exist() {
        let temp = TempDir::new().unwrap();
        let err = theme_root(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_theme_root_must_be_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("layout.liquid");
        std::fs::write(&file, "").unwrap();

        let err = theme_root(&file).unwrap_err();
        assert!(matches!(err, CliError::NotADirectory(_)));
    }

    #[test]
    fn test_theme_root_is_canonical() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("shop")).unwrap();

        let root = theme_root(&temp.path().join("shop/../shop")).unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("shop"));
        assert!(!root.to_string_lossy().contains(".."));
    }
}
