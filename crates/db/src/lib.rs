//! In-memory table storage for bookcase.
//!
//! A [`Table`] owns rows keyed by ids it assigns itself. Ids are monotonic
//! and never reused, so a deleted row's id keeps resolving to nothing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;

/// Store-assigned row identifier.
pub type RowId = u64;

/// Rows of one kind, guarded by an async read/write lock.
pub struct Table<T> {
    name: &'static str,
    inner: RwLock<TableInner<T>>,
}

struct TableInner<T> {
    next_id: RowId,
    rows: BTreeMap<RowId, T>,
}

impl<T: Clone + Send + Sync> Table<T> {
    /// Create an empty table. The first inserted row gets id 1.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(TableInner {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Insert a row built from its freshly assigned id.
    pub async fn insert_with<F>(&self, build: F) -> T
    where
        F: FnOnce(RowId) -> T,
    {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let row = build(id);
        inner.rows.insert(id, row.clone());
        tracing::debug!(table = self.name, id, "row inserted");
        row
    }

    pub async fn get(&self, id: RowId) -> Option<T> {
        self.inner.read().await.rows.get(&id).cloned()
    }

    /// All rows in id order.
    pub async fn list(&self) -> Vec<T> {
        self.inner.read().await.rows.values().cloned().collect()
    }

    /// Replace an existing row. Returns `false` when `id` is absent.
    pub async fn replace(&self, id: RowId, row: T) -> bool {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&id) {
            Some(slot) => {
                *slot = row;
                tracing::debug!(table = self.name, id, "row replaced");
                true
            }
            None => false,
        }
    }

    /// Remove a row, returning it when it existed.
    pub async fn remove(&self, id: RowId) -> Option<T> {
        let removed = self.inner.write().await.rows.remove(&id);
        if removed.is_some() {
            tracing::debug!(table = self.name, id, "row removed");
        }
        removed
    }

    /// Number of live rows.
    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}

/// Failure to read a seed file.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to read seed file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed file {path} is not a JSON array of records")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON array of records from `path`.
pub fn load_seed<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<T> = serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), count = records.len(), "seed file loaded");
    Ok(records)
}
