//! GPX resource loading from the site directory or a remote base URL.

use std::path::PathBuf;
use std::sync::Arc;

use object_store::{ObjectStore, http::HttpBuilder, local::LocalFileSystem, path::Path};
use tracing::info;

use crate::config::RouteSource;
use crate::errors::RouteError;

/// Read-only access to the site's GPX resources.
#[derive(Clone, Debug)]
pub struct RouteStore {
    store: Arc<dyn ObjectStore>,
    local_root: Option<PathBuf>,
}

impl RouteStore {
    /// Resources are resolved relative to `base_path`, which must exist.
    pub fn new_local(base_path: impl AsRef<std::path::Path>) -> Result<Self, RouteError> {
        let store = LocalFileSystem::new_with_prefix(base_path.as_ref()).map_err(|e| {
            RouteError::Network(format!(
                "Failed to open site directory {}: {e}",
                base_path.as_ref().display()
            ))
        })?;
        Ok(Self {
            store: Arc::new(store),
            local_root: Some(base_path.as_ref().to_path_buf()),
        })
    }

    pub fn new_http(base_url: &str) -> Result<Self, RouteError> {
        let store = HttpBuilder::new()
            .with_url(base_url)
            .build()
            .map_err(|e| RouteError::Network(format!("Invalid route base URL {base_url}: {e}")))?;
        Ok(Self {
            store: Arc::new(store),
            local_root: None,
        })
    }

    pub fn from_source(source: &RouteSource) -> Result<Self, RouteError> {
        match source {
            RouteSource::Local(dir) => Self::new_local(dir),
            RouteSource::Http(url) => Self::new_http(url),
        }
    }

    /// Site directory when resources are read from the local filesystem.
    pub fn local_root(&self) -> Option<&std::path::Path> {
        self.local_root.as_deref()
    }

    /// Fetches a resource as text. Every failure is reported as a load
    /// failure and is not retried.
    pub async fn fetch(&self, resource_path: &str) -> Result<String, RouteError> {
        info!("Loading GPX: {resource_path}");

        let path = Path::parse(resource_path.trim_start_matches('/')).map_err(|e| {
            RouteError::Network(format!("Invalid resource path {resource_path}: {e}"))
        })?;

        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| RouteError::Network(format!("{resource_path}: {e}")))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| RouteError::Network(format!("Failed to read {resource_path}: {e}")))?;

        info!("GPX loaded: {resource_path}, {} bytes", bytes.len());

        String::from_utf8(bytes.to_vec())
            .map_err(|e| RouteError::XmlParse(format!("document is not valid UTF-8: {e}")))
    }
}
