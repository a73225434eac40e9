//! Per-grid preferences and form drafts in the local store.

use crate::domain::grid::SortSpec;
use ctn_storage::{NamespacedStorage, StorageError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Persisted part of a grid state. Search text and current page are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridPreferences {
    pub visible_columns: Option<Vec<String>>,
    pub sort: Option<SortSpec>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    store: NamespacedStorage,
}

impl PreferenceStore {
    #[must_use]
    pub const fn new(store: NamespacedStorage) -> Self {
        Self { store }
    }

    /// Preferences of a grid; unreadable documents fall back to defaults.
    pub async fn load(&self, grid_id: &str) -> GridPreferences {
        match self.store.get(grid_id).await {
            Ok(prefs) => prefs.unwrap_or_default(),
            Err(e) => {
                warn!(grid = grid_id, error = %e, "Grid preferences unreadable, using defaults");
                GridPreferences::default()
            },
        }
    }

    pub async fn save(&self, grid_id: &str, prefs: &GridPreferences) -> Result<(), StorageError> {
        debug!(grid = grid_id, "Saving grid preferences");
        self.store.put(grid_id, prefs).await
    }

    pub async fn reset(&self, grid_id: &str) -> Result<bool, StorageError> {
        self.store.remove(grid_id).await
    }
}

/// Unsaved form input, keyed per form (`member.create`, `identifier.<entity>` ...).
#[derive(Debug, Clone)]
pub struct DraftStore {
    store: NamespacedStorage,
}

impl DraftStore {
    #[must_use]
    pub const fn new(store: NamespacedStorage) -> Self {
        Self { store }
    }

    pub async fn save<T: Serialize + ?Sized>(&self, form: &str, draft: &T) -> Result<(), StorageError> {
        debug!(form, "Saving draft");
        self.store.put(form, draft).await
    }

    pub async fn load<T: DeserializeOwned>(&self, form: &str) -> Result<Option<T>, StorageError> {
        self.store.get(form).await
    }

    pub async fn clear(&self, form: &str) -> Result<bool, StorageError> {
        self.store.remove(form).await
    }

    /// Forms with a saved draft.
    pub async fn pending(&self) -> Result<Vec<String>, StorageError> {
        self.store.keys().await
    }
}
