use crate::engine::Storage;
use crate::error::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

/// Lowercase `[a-z0-9_]` directory name under the storage root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName(String);

impl TryFrom<&str> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.trim().to_lowercase();

        if name.is_empty() {
            return Err(StorageError::InvalidKey {
                message: "EMPTY".into(),
                context: Some("Namespace cannot be empty".into()),
            });
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StorageError::InvalidKey {
                message: name.into(),
                context: Some("Namespace contains illegal characters".into()),
            });
        }

        Ok(Self(name))
    }
}

impl TryFrom<String> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for NamespaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scoped view of [`Storage`]; keys are relative to the namespace directory.
#[derive(Debug, Clone)]
pub struct NamespacedStorage {
    storage: Storage,
    namespace: Arc<NamespaceName>,
}

impl NamespacedStorage {
    pub(crate) fn new(storage: Storage, namespace: NamespaceName) -> Self {
        Self { storage, namespace: Arc::new(namespace) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.namespace.as_ref().as_ref()
    }

    /// # Errors
    /// Invalid key, I/O failure, or a document that does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.storage.get_internal(Some(self.name()), key).await
    }

    /// # Errors
    /// Invalid key, encoding or I/O failure.
    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.storage.put_internal(Some(self.name()), key, value).await
    }

    /// # Errors
    /// Invalid key or I/O failure.
    pub async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.storage.remove_internal(Some(self.name()), key).await
    }

    /// # Errors
    /// I/O failure while listing.
    pub async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.storage.keys_internal(Some(self.name())).await
    }

    /// Removes every document in the namespace and returns how many were deleted.
    ///
    /// # Errors
    /// I/O failure while listing or deleting.
    pub async fn clear(&self) -> Result<usize, StorageError> {
        let mut removed = 0;
        for key in self.keys().await? {
            if self.remove(&key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
