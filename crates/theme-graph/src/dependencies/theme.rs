use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::web_components::find_definitions;
use super::{Dependencies, WebComponentDefinition};
use crate::module::ModuleKind;
use crate::resolver::{self, ASSETS_DIR, BLOCKS_DIR};
use crate::runtime::{FileKind, FileSystem, RuntimeResult};
use crate::schema::ThemeSchema;
use crate::source::{SourceCode, parse_source};
use crate::uri::Uri;

type WebComponentMap = FxHashMap<String, WebComponentDefinition>;

/// Default [`Dependencies`] over a [`FileSystem`].
///
/// Sources are parsed with the built-in scanners. Custom element definitions are
/// found by scanning `assets/*.js`; the resulting map is kept until a script is
/// invalidated.
#[derive(Debug)]
pub struct ThemeDependencies<F> {
    root: Uri,
    fs: F,
    web_components: RwLock<Option<Arc<WebComponentMap>>>,
}

impl<F: FileSystem> ThemeDependencies<F> {
    pub fn new(root: Uri, fs: F) -> Self {
        Self {
            root,
            fs,
            web_components: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Uri {
        &self.root
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    async fn schema_of(&self, uri: Uri) -> Option<Arc<ThemeSchema>> {
        let source = self.get_source_code(&uri).await.ok()?;
        self.schema_from_source(&source)
    }

    async fn web_component_map(&self) -> Arc<WebComponentMap> {
        let cached = self.web_components.read().clone();
        if let Some(map) = cached {
            return map;
        }

        let map = Arc::new(self.scan_web_components().await);
        *self.web_components.write() = Some(Arc::clone(&map));
        map
    }

    async fn scan_web_components(&self) -> WebComponentMap {
        let assets = self.root.join(ASSETS_DIR);
        let scripts: Vec<Uri> = match self.fs.read_directory(&assets).await {
            Ok(entries) => entries
                .into_iter()
                .filter(|(uri, kind)| {
                    *kind == FileKind::File
                        && resolver::classify(&self.root, uri) == Some(ModuleKind::JavaScript)
                })
                .map(|(uri, _)| uri)
                .collect(),
            Err(e) => {
                debug!(error = %e, "no assets directory to scan for custom elements");
                return WebComponentMap::default();
            }
        };

        let contents = join_all(scripts.iter().map(|uri| self.fs.read_file(uri))).await;

        let mut map = WebComponentMap::default();
        for (uri, content) in scripts.iter().zip(contents) {
            let Ok(content) = content else {
                continue;
            };
            for (name, range) in find_definitions(&content) {
                map.entry(name).or_insert_with(|| WebComponentDefinition {
                    asset_uri: uri.clone(),
                    range,
                });
            }
        }
        debug!(count = map.len(), "indexed custom element definitions");
        map
    }
}

#[async_trait]
impl<F: FileSystem> Dependencies for ThemeDependencies<F> {
    async fn exists(&self, uri: &Uri) -> bool {
        self.fs.exists(uri).await
    }

    async fn read_file(&self, uri: &Uri) -> RuntimeResult<String> {
        self.fs.read_file(uri).await
    }

    async fn read_directory(&self, uri: &Uri) -> RuntimeResult<Vec<(Uri, FileKind)>> {
        self.fs.read_directory(uri).await
    }

    async fn get_source_code(&self, uri: &Uri) -> RuntimeResult<Arc<SourceCode>> {
        let text = self.fs.read_file(uri).await?;
        Ok(Arc::new(parse_source(uri.clone(), text)))
    }

    async fn get_section_schema(&self, name: &str) -> Option<Arc<ThemeSchema>> {
        self.schema_of(resolver::section_uri(&self.root, name)).await
    }

    async fn get_block_schema(&self, name: &str) -> Option<Arc<ThemeSchema>> {
        self.schema_of(resolver::block_uri(&self.root, name)).await
    }

    async fn get_web_component_definition_reference(
        &self,
        tag_name: &str,
    ) -> Option<WebComponentDefinition> {
        self.web_component_map().await.get(tag_name).cloned()
    }

    async fn get_theme_block_names(&self) -> Vec<String> {
        let blocks = self.root.join(BLOCKS_DIR);
        let Ok(entries) = self.fs.read_directory(&blocks).await else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .into_iter()
            .filter(|(uri, kind)| *kind == FileKind::File && resolver::is_public_block(&self.root, uri))
            .map(|(uri, _)| uri.file_stem().to_string())
            .collect();
        names.sort();
        names
    }

    fn invalidate(&self, uri: &Uri) {
        if resolver::classify(&self.root, uri) == Some(ModuleKind::JavaScript) {
            *self.web_components.write() = None;
        }
    }
}
