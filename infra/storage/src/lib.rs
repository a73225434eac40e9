//! Sandboxed JSON document store used for the portal's local state: grid preferences,
//! form drafts and the cached session.
//!
//! - **Sandbox**: keys and namespaces are validated and every path is checked against the
//!   canonical root, so nothing resolves outside it.
//! - **Atomic writes**: unique temp file, `fsync`, `rename`. No locking; last write wins.
//! - **Self-healing**: temp files orphaned by a crash are purged on connect.

mod builder;
mod engine;
mod error;
mod maintenance;
mod namespace;
mod security;

pub use builder::StorageBuilder;
pub use engine::Storage;
pub use error::{StorageError, StorageErrorExt};
pub use namespace::{NamespaceName, NamespacedStorage};
