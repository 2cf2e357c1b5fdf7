//! The environment the graph is built against.
//!
//! [`Dependencies`] is everything the traverser needs from the outside world:
//! file access, parsed sources, schemas and custom element definitions. The graph
//! code never reaches past it, so an editor can serve unsaved buffers or its own
//! parser by providing another implementation.

mod cache;
mod theme;
pub mod web_components;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::reference::Range;
use crate::runtime::{FileKind, RuntimeResult};
use crate::schema::ThemeSchema;
use crate::source::SourceCode;
use crate::uri::Uri;

pub use cache::PassCache;
pub use theme::ThemeDependencies;

/// Where a custom element is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebComponentDefinition {
    pub asset_uri: Uri,
    /// Range of the element name in the asset's source.
    pub range: Range,
}

/// Capabilities the graph requires from its environment.
#[async_trait]
pub trait Dependencies: Send + Sync + std::fmt::Debug {
    /// Whether a file exists at `uri`. Never fails.
    async fn exists(&self, uri: &Uri) -> bool;

    async fn read_file(&self, uri: &Uri) -> RuntimeResult<String>;

    async fn read_directory(&self, uri: &Uri) -> RuntimeResult<Vec<(Uri, FileKind)>>;

    /// Source text and syntax tree of a file.
    ///
    /// A file that cannot be parsed is still `Ok`; the parse error lives in
    /// [`SourceCode::ast`].
    async fn get_source_code(&self, uri: &Uri) -> RuntimeResult<Arc<SourceCode>>;

    /// Schema of `sections/{name}.liquid`, or `None` when it declares none.
    async fn get_section_schema(&self, name: &str) -> Option<Arc<ThemeSchema>>;

    /// Schema of `blocks/{name}.liquid`, or `None` when it declares none.
    async fn get_block_schema(&self, name: &str) -> Option<Arc<ThemeSchema>>;

    async fn get_web_component_definition_reference(
        &self,
        tag_name: &str,
    ) -> Option<WebComponentDefinition>;

    /// Names of the public (not `_`-prefixed) files in `blocks/`.
    async fn get_theme_block_names(&self) -> Vec<String>;

    /// Schema declared by an already loaded source. An invalid schema counts as none.
    fn schema_from_source(&self, source: &SourceCode) -> Option<Arc<ThemeSchema>> {
        match ThemeSchema::from_source(source)? {
            Ok(schema) => Some(Arc::new(schema)),
            Err(e) => {
                debug!(uri = %source.uri, error = %e, "ignoring invalid schema");
                None
            }
        }
    }

    /// Drop anything cached about `uri`. Called for every file an update touches.
    fn invalidate(&self, _uri: &Uri) {}
}

#[async_trait]
impl<T: Dependencies + ?Sized> Dependencies for Arc<T> {
    async fn exists(&self, uri: &Uri) -> bool {
        (**self).exists(uri).await
    }

    async fn read_file(&self, uri: &Uri) -> RuntimeResult<String> {
        (**self).read_file(uri).await
    }

    async fn read_directory(&self, uri: &Uri) -> RuntimeResult<Vec<(Uri, FileKind)>> {
        (**self).read_directory(uri).await
    }

    async fn get_source_code(&self, uri: &Uri) -> RuntimeResult<Arc<SourceCode>> {
        (**self).get_source_code(uri).await
    }

    async fn get_section_schema(&self, name: &str) -> Option<Arc<ThemeSchema>> {
        (**self).get_section_schema(name).await
    }

    async fn get_block_schema(&self, name: &str) -> Option<Arc<ThemeSchema>> {
        (**self).get_block_schema(name).await
    }

    async fn get_web_component_definition_reference(
        &self,
        tag_name: &str,
    ) -> Option<WebComponentDefinition> {
        (**self).get_web_component_definition_reference(tag_name).await
    }

    async fn get_theme_block_names(&self) -> Vec<String> {
        (**self).get_theme_block_names().await
    }

    fn schema_from_source(&self, source: &SourceCode) -> Option<Arc<ThemeSchema>> {
        (**self).schema_from_source(source)
    }

    fn invalidate(&self, uri: &Uri) {
        (**self).invalidate(uri)
    }
}
