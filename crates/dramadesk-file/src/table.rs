//! File-backed [`TableBackend`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use dramadesk_core::Result;
use dramadesk_core::error::{Error, InvalidInputError, TransportError};
use dramadesk_core::table::{Delete, Insert, Row, Select, Update};
use dramadesk_core::traits::TableBackend;
use dramadesk_core::types::BackendUrl;

use crate::store::TableStore;

/// Tables stored as JSON files under a local directory.
#[derive(Debug, Clone)]
pub struct FileTable {
    url: BackendUrl,
    store: TableStore,
}

impl FileTable {
    /// Open the tables rooted at a `file://` URL.
    pub fn new(url: BackendUrl) -> Result<Self> {
        let root: PathBuf = url.to_file_path().ok_or_else(|| {
            Error::from(InvalidInputError::BackendUrl {
                value: url.to_string(),
                reason: "file tables require a file:// URL".to_string(),
            })
        })?;

        debug!(root = %root.display(), "Opening file tables");
        Ok(Self {
            url,
            store: TableStore::new(root),
        })
    }

    /// Open the tables rooted at a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        let url = BackendUrl::from_file_path(&root)?;
        Ok(Self {
            url,
            store: TableStore::new(root),
        })
    }

    pub fn url(&self) -> &BackendUrl {
        &self.url
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Run a store operation off the async executor.
    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&TableStore) -> Result<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| {
                Error::Transport(TransportError::Io {
                    message: format!("file table task failed: {}", e),
                })
            })?
    }
}

#[async_trait]
impl TableBackend for FileTable {
    async fn select(&self, query: &Select) -> Result<Vec<Row>> {
        let query = query.clone();
        self.blocking(move |store| store.select(&query)).await
    }

    async fn insert(&self, query: &Insert) -> Result<Row> {
        let query = query.clone();
        self.blocking(move |store| store.insert(&query)).await
    }

    async fn update(&self, query: &Update) -> Result<Vec<Row>> {
        let query = query.clone();
        self.blocking(move |store| store.update(&query)).await
    }

    async fn delete(&self, query: &Delete) -> Result<usize> {
        let query = query.clone();
        self.blocking(move |store| store.delete(&query)).await
    }
}
