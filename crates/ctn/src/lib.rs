//! Facade crate for the register portal.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it composes the feature slices, it does not implement them.
//!
//! ## Usage
//! - Depend on `ctn` (add `server` for the sandbox HTTP pieces).
//! - Call [`bootstrap`] to get a [`kernel::state::PortalState`] with every slice registered.

use ctn_kernel::client::{ApiClient, ClientError};
use ctn_kernel::notify::Notifier;
use ctn_kernel::state::{PortalState, PortalStateError};
use ctn_storage::{Storage, StorageError};
use std::borrow::Cow;
use tracing::info;

pub use ctn_domain as domain;
pub use ctn_events as events;
pub use ctn_kernel as kernel;

use domain::config::PortalConfig;
use domain::registry::InitializedSlice;
use events::EventBus;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use ctn_kernel::server::system_router;
    }
    pub use ctn_kernel::server::HealthResponse;
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use ctn_audit as audit;
    pub use ctn_contacts as contacts;
    pub use ctn_endpoints as endpoints;
    pub use ctn_identifiers as identifiers;
    pub use ctn_members as members;
    pub use ctn_tokens as tokens;
    pub use ctn_verification as verification;

    /// Feature slices registered by [`crate::init`], plus build-time flags.
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "members",
        "identifiers",
        "contacts",
        "endpoints",
        "tokens",
        "audit",
        "verification",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[ctn_derive::ctn_error]
pub enum BootstrapError {
    #[error("Local store unavailable{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("API client unavailable{}: {source}", format_context(.context))]
    Client { source: ClientError, context: Option<Cow<'static, str>> },

    #[error("Portal state incomplete{}: {source}", format_context(.context))]
    State { source: PortalStateError, context: Option<Cow<'static, str>> },
}

/// Initialize every feature slice against a shared client and notifier.
#[must_use]
pub fn init(config: &PortalConfig, client: &ApiClient, notifier: &Notifier) -> Vec<InitializedSlice> {
    vec![
        features::members::init(client.clone(), notifier.clone()),
        features::identifiers::init(client.clone(), notifier.clone()),
        features::contacts::init(client.clone(), notifier.clone()),
        features::endpoints::init(client.clone(), notifier.clone()),
        features::tokens::init(client.clone(), notifier.clone()),
        features::audit::init(client.clone()),
        features::verification::init(client.clone(), notifier.clone(), config.verification.clone()),
    ]
}

/// Opens the local store, builds the shared services and registers every slice.
///
/// The cached session is not restored here; call
/// [`PortalState::restore_session`](kernel::state::PortalState::restore_session) before the
/// first API call.
///
/// # Errors
/// The data directory cannot be used, or the HTTP client cannot be built.
pub async fn bootstrap(config: PortalConfig) -> Result<PortalState, BootstrapError> {
    let storage = Storage::builder()
        .root(&config.storage.data_dir)
        .connect()
        .await
        .context(format!("Data directory {}", config.storage.data_dir.display()))?;

    let events = EventBus::new();
    let notifier = Notifier::new(events.clone());
    let client = ApiClient::new(&config.api)?;
    let slices = init(&config, &client, &notifier);
    info!(slices = slices.len(), api = %client.base_url(), "Portal bootstrapped");

    Ok(PortalState::builder()
        .config(config)
        .storage(storage)
        .client(client)
        .events(events)
        .notifier(notifier)
        .register_slices(slices)
        .build()?)
}
