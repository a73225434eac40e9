//! The [`Storage`] handle: JSON documents under a sandboxed root, replaced atomically.

use crate::builder::StorageBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance::{self, TMP_MARKER};
use crate::namespace::{NamespaceName, NamespacedStorage};
use crate::security;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct StorageInner {
    /// Canonical physical root; every resolved path starts with it.
    pub(crate) root: PathBuf,
    pub(crate) tmp_counter: AtomicU64,
}

/// Cheaply cloneable handle to the document store.
///
/// Each document is one `<key>.json` file. Writes go to a unique temp file, are synced, then
/// renamed over the target, so readers see either the old or the new document. Concurrent
/// writers to one key are last-write-wins.
///
/// ```rust
/// use ctn_storage::{Storage, StorageError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), StorageError> {
/// # let tmp = tempfile::tempdir().unwrap();
/// let storage = Storage::builder().root(tmp.path().join("data")).connect().await?;
/// let prefs = storage.namespace("prefs")?;
///
/// prefs.put("grid.members", &vec!["legalName", "orgId"]).await?;
/// let columns: Option<Vec<String>> = prefs.get("grid.members").await?;
/// assert_eq!(columns.map(|c| c.len()), Some(2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Storage {
    #[must_use = "The storage is not initialized until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Scoped view whose documents live in `<root>/<name>/`.
    ///
    /// # Errors
    /// [`StorageError::InvalidKey`] for empty names or characters outside `[a-z0-9_]`.
    pub fn namespace<N>(&self, name: N) -> Result<NamespacedStorage, StorageError>
    where
        N: TryInto<NamespaceName, Error = StorageError>,
    {
        Ok(NamespacedStorage::new(self.clone(), name.try_into()?))
    }

    /// Reads a root-level document. Missing documents are `Ok(None)`.
    ///
    /// # Errors
    /// Invalid key, I/O failure, or a document that does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.get_internal(None, key).await
    }

    /// Atomically replaces a root-level document.
    ///
    /// # Errors
    /// Invalid key, encoding or I/O failure.
    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.put_internal(None, key, value).await
    }

    /// Removes a root-level document; returns whether it existed.
    ///
    /// # Errors
    /// Invalid key or I/O failure.
    pub async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.remove_internal(None, key).await
    }

    /// Sorted keys of root-level documents.
    ///
    /// # Errors
    /// I/O failure while listing.
    pub async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.keys_internal(None).await
    }

    /// Removes orphaned temp files and returns how many were deleted.
    pub async fn purge_tmp(&self) -> usize {
        maintenance::purge_tmp(&self.inner.root).await
    }

    pub(crate) async fn get_internal<T: DeserializeOwned>(
        &self,
        namespace: Option<&str>,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        let path = security::document_path(&self.inner.root, namespace, key)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", path.display()).into()),
                });
            },
        };

        serde_json::from_slice(&bytes).context(format!("Decoding document '{key}'")).map(Some)
    }

    pub(crate) async fn put_internal<T: Serialize + ?Sized>(
        &self,
        namespace: Option<&str>,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let path = security::document_path(&self.inner.root, namespace, key)?;
        let data = serde_json::to_vec_pretty(value).context(format!("Encoding document '{key}'"))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create {}", parent.display()))?;
        }

        let temp = self.unique_tmp_path(&path);
        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&data).await.context("Write failed")?;
            file.sync_all().await.context("Sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::Io {
                source: err,
                context: Some(
                    format!("Atomic swap failed: {} -> {}", temp.display(), path.display()).into(),
                ),
            });
        }

        debug!(key, namespace, "Document saved");
        Ok(())
    }

    pub(crate) async fn remove_internal(
        &self,
        namespace: Option<&str>,
        key: &str,
    ) -> Result<bool, StorageError> {
        let path = security::document_path(&self.inner.root, namespace, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, namespace, "Document removed");
                Ok(true)
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Failed to delete: {}", path.display()).into()),
            }),
        }
    }

    pub(crate) async fn keys_internal(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<String>, StorageError> {
        let dir = match namespace {
            Some(ns) => security::resolve_path(&self.inner.root, ns)?,
            None => self.inner.root.clone(),
        };

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Failed to list {}", dir.display()).into()),
                });
            },
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await.context("Listing documents")? {
            match entry.file_type().await {
                Ok(kind) if kind.is_file() => {
                    if let Some(key) = security::key_of(&entry.path()) {
                        keys.push(key);
                    }
                },
                Ok(_) => {},
                Err(err) => warn!(path = %entry.path().display(), error = %err, "Skipping entry"),
            }
        }
        keys.sort_unstable();
        Ok(keys)
    }

    fn unique_tmp_path(&self, target: &Path) -> PathBuf {
        let counter = self.inner.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("document");
        target.with_file_name(format!("{file_name}{TMP_MARKER}{}-{counter}", std::process::id()))
    }
}
