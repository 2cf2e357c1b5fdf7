use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::OnceCell;

use super::{Dependencies, WebComponentDefinition};
use crate::module::{LiquidKind, ModuleKind};
use crate::resolver;
use crate::runtime::{FileKind, RuntimeResult};
use crate::schema::ThemeSchema;
use crate::source::SourceCode;
use crate::uri::Uri;

type Memo<K, V> = DashMap<K, Arc<OnceCell<V>>>;

/// Memoizes a [`Dependencies`] for the duration of one build or update.
///
/// A file reached through several paths is read and parsed once. Concurrent
/// requests for the same key wait on the first one instead of racing it.
/// Section and block schemas come from the same cached sources the traversal
/// reads, so a file with a schema is not loaded a second time for it.
#[derive(Debug)]
pub struct PassCache<'a> {
    inner: &'a dyn Dependencies,
    root: Uri,
    sources: Memo<Uri, RuntimeResult<Arc<SourceCode>>>,
    section_schemas: Memo<String, Option<Arc<ThemeSchema>>>,
    block_schemas: Memo<String, Option<Arc<ThemeSchema>>>,
    web_components: Memo<String, Option<WebComponentDefinition>>,
    block_names: OnceCell<Vec<String>>,
}

impl<'a> PassCache<'a> {
    pub fn new(inner: &'a dyn Dependencies, root: Uri) -> Self {
        Self {
            inner,
            root,
            sources: DashMap::new(),
            section_schemas: DashMap::new(),
            block_schemas: DashMap::new(),
            web_components: DashMap::new(),
            block_names: OnceCell::new(),
        }
    }

    /// Number of distinct sources requested so far.
    pub fn sources_loaded(&self) -> usize {
        self.sources.len()
    }

    async fn schema_at(&self, uri: Uri) -> Option<Arc<ThemeSchema>> {
        let source = self.get_source_code(&uri).await.ok()?;
        self.inner.schema_from_source(&source)
    }
}

async fn memoize<K, V, F, Fut>(memo: &Memo<K, V>, key: K, init: F) -> V
where
    K: Eq + Hash,
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = V>,
{
    let cell = Arc::clone(memo.entry(key).or_default().value());
    cell.get_or_init(init).await.clone()
}

#[async_trait]
impl<'a> Dependencies for PassCache<'a> {
    async fn exists(&self, uri: &Uri) -> bool {
        self.inner.exists(uri).await
    }

    async fn read_file(&self, uri: &Uri) -> RuntimeResult<String> {
        self.inner.read_file(uri).await
    }

    async fn read_directory(&self, uri: &Uri) -> RuntimeResult<Vec<(Uri, FileKind)>> {
        self.inner.read_directory(uri).await
    }

    async fn get_source_code(&self, uri: &Uri) -> RuntimeResult<Arc<SourceCode>> {
        memoize(&self.sources, uri.clone(), || self.inner.get_source_code(uri)).await
    }

    async fn get_section_schema(&self, name: &str) -> Option<Arc<ThemeSchema>> {
        memoize(&self.section_schemas, name.to_string(), || {
            self.schema_at(resolver::section_uri(&self.root, name))
        })
        .await
    }

    async fn get_block_schema(&self, name: &str) -> Option<Arc<ThemeSchema>> {
        memoize(&self.block_schemas, name.to_string(), || {
            self.schema_at(resolver::block_uri(&self.root, name))
        })
        .await
    }

    async fn get_web_component_definition_reference(
        &self,
        tag_name: &str,
    ) -> Option<WebComponentDefinition> {
        memoize(&self.web_components, tag_name.to_string(), || {
            self.inner.get_web_component_definition_reference(tag_name)
        })
        .await
    }

    async fn get_theme_block_names(&self) -> Vec<String> {
        self.block_names
            .get_or_init(|| self.inner.get_theme_block_names())
            .await
            .clone()
    }

    fn invalidate(&self, uri: &Uri) {
        self.inner.invalidate(uri);
        self.sources.remove(uri);
        match resolver::classify(&self.root, uri) {
            Some(ModuleKind::Liquid(LiquidKind::Section)) => {
                self.section_schemas.remove(uri.file_stem());
            }
            Some(ModuleKind::Liquid(LiquidKind::Block)) => {
                self.block_schemas.remove(uri.file_stem());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use rustc_hash::FxHashMap;

    use super::*;
    use crate::build;
    use crate::dependencies::ThemeDependencies;
    use crate::runtime::FileSystem;
    use crate::runtime::test_utils::MemoryFileSystem;

    /// Records every file read that reaches the file system.
    #[derive(Debug)]
    struct CountingFileSystem {
        inner: MemoryFileSystem,
        reads: Mutex<FxHashMap<Uri, usize>>,
    }

    impl CountingFileSystem {
        fn new(root: &Uri, files: &[(&str, &str)]) -> Self {
            Self {
                inner: MemoryFileSystem::with_files(root.clone(), files.iter().copied()),
                reads: Mutex::new(FxHashMap::default()),
            }
        }

        fn reads_of(&self, uri: &Uri) -> usize {
            self.reads.lock().get(uri).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl FileSystem for CountingFileSystem {
        async fn exists(&self, uri: &Uri) -> bool {
            self.inner.exists(uri).await
        }

        async fn read_file(&self, uri: &Uri) -> RuntimeResult<String> {
            *self.reads.lock().entry(uri.clone()).or_default() += 1;
            self.inner.read_file(uri).await
        }

        async fn read_directory(&self, uri: &Uri) -> RuntimeResult<Vec<(Uri, FileKind)>> {
            self.inner.read_directory(uri).await
        }
    }

    const HERO: &str = r#"{% content_for 'blocks' %}
{% schema %}
{"name": "Hero", "blocks": [{"type": "text"}], "presets": [{"name": "Hero", "blocks": [{"type": "text"}]}]}
{% endschema %}"#;

    const TEXT: &str = r#"{% render 'label' %}
{% schema %}
{"name": "Text", "settings": []}
{% endschema %}"#;

    #[tokio::test]
    async fn test_build_reads_each_file_once() {
        let root = Uri::new("file:///theme").unwrap();
        let fs = Arc::new(CountingFileSystem::new(
            &root,
            &[
                (
                    "templates/index.json",
                    r#"{"sections": {"hero": {"type": "hero", "blocks": {"t": {"type": "text"}}}}, "order": ["hero"]}"#,
                ),
                ("sections/hero.liquid", HERO),
                ("blocks/text.liquid", TEXT),
                ("snippets/label.liquid", "<span>label</span>"),
                ("layout/theme.liquid", "{{ content_for_layout }}"),
            ],
        ));
        let deps = ThemeDependencies::new(root.clone(), Arc::clone(&fs));

        let graph = build(root.clone(), &deps, None).await;

        assert!(graph.contains(&root.join("blocks/text.liquid")));
        for path in ["sections/hero.liquid", "blocks/text.liquid", "templates/index.json"] {
            assert_eq!(fs.reads_of(&root.join(path)), 1, "{path} read once per build");
        }
        for (uri, count) in fs.reads.lock().iter() {
            assert_eq!(*count, 1, "{uri} read {count} times in one build");
        }
    }

    #[tokio::test]
    async fn test_invalidate_drops_source_and_schema() {
        let root = Uri::new("file:///theme").unwrap();
        let fs = Arc::new(CountingFileSystem::new(&root, &[("sections/hero.liquid", HERO)]));
        let deps = ThemeDependencies::new(root.clone(), Arc::clone(&fs));
        let cache = PassCache::new(&deps, root.clone());
        let uri = root.join("sections/hero.liquid");

        let schema = cache.get_section_schema("hero").await.unwrap();
        assert_eq!(schema.blocks.len(), 1);
        cache.get_source_code(&uri).await.unwrap();
        assert_eq!(fs.reads_of(&uri), 1);
        assert_eq!(cache.sources_loaded(), 1);

        fs.inner.write("sections/hero.liquid", "<p>no schema</p>");
        cache.invalidate(&uri);
        assert!(cache.get_section_schema("hero").await.is_none());
        assert_eq!(fs.reads_of(&uri), 2);
    }

    #[tokio::test]
    async fn test_missing_files_are_memoized_as_errors() {
        let root = Uri::new("file:///theme").unwrap();
        let fs = Arc::new(CountingFileSystem::new(&root, &[]));
        let deps = ThemeDependencies::new(root.clone(), Arc::clone(&fs));
        let cache = PassCache::new(&deps, root.clone());

        let uri = root.join("snippets/missing.liquid");
        assert!(cache.get_source_code(&uri).await.is_err());
        assert!(cache.get_source_code(&uri).await.is_err());
        assert!(cache.get_block_schema("missing").await.is_none());
        assert_eq!(fs.reads_of(&uri), 1);
    }
}
