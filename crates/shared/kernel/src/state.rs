use crate::client::{ApiClient, ClientError, Credentials};
use crate::domain::config::PortalConfig;
use crate::domain::registry::{FeatureSlice, InitializedSlice};
use crate::notify::Notifier;
use crate::prefs::{DraftStore, PreferenceStore};
use crate::session::{Session, SessionCache};
use ctn_events::EventBus;
use ctn_storage::{Storage, StorageError};
use fxhash::FxHashMap;
use std::any::TypeId;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[ctn_derive::ctn_error]
pub enum PortalStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("State missing feature slice{}: {message}", format_context(.context))]
    MissingSlice { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Local store unavailable{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("API client unavailable{}: {source}", format_context(.context))]
    Client { source: ClientError, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct PortalStateInner {
    pub config: PortalConfig,
    pub client: ApiClient,
    pub events: EventBus,
    pub notifier: Notifier,
    pub storage: Storage,
    pub session: SessionCache,
    pub prefs: PreferenceStore,
    pub drafts: DraftStore,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Everything a view needs: shared services plus the registered feature slices.
#[derive(Debug, Clone)]
pub struct PortalState {
    inner: Arc<PortalStateInner>,
}

impl PortalState {
    #[must_use]
    pub fn builder() -> PortalStateBuilder {
        PortalStateBuilder::default()
    }

    #[must_use]
    pub fn get_slice<T: FeatureSlice>(&self) -> Option<&T> {
        self.inner
            .slices
            .get(&TypeId::of::<T>())
            .and_then(|initialized| initialized.state.as_any().downcast_ref::<T>())
    }

    /// Returns a reference to the slice if it is registered.
    ///
    /// # Errors
    /// Returns an error if the slice is not registered.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, PortalStateError> {
        self.get_slice::<T>().ok_or_else(|| PortalStateError::MissingSlice {
            message: std::any::type_name::<T>().into(),
            context: None,
        })
    }

    /// Registered slice names (diagnostics).
    pub fn slice_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner.slices.values().map(InitializedSlice::name)
    }

    /// Loads the cached session and attaches it to the API client. `None` when signed out or
    /// expired.
    pub async fn restore_session(&self) -> Option<Session> {
        let session = self.session.current().await;
        self.client.set_credentials(session.as_ref().map(|s| Credentials {
            token: s.token.clone(),
            account: s.account.clone(),
        }));
        session
    }
}

impl Deref for PortalState {
    type Target = PortalStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Default)]
pub struct PortalStateBuilder {
    config: Option<PortalConfig>,
    storage: Option<Storage>,
    client: Option<ApiClient>,
    events: Option<EventBus>,
    notifier: Option<Notifier>,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

impl PortalStateBuilder {
    #[must_use]
    pub fn config(mut self, config: PortalConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Client shared with the slices; built from `config.api` when omitted.
    #[must_use]
    pub fn client(mut self, client: ApiClient) -> Self {
        self.client = Some(client);
        self
    }

    #[must_use]
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Notifier already handed to the slices; must publish on the same bus as `events`.
    #[must_use]
    pub fn notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.slices.insert(slice.id, slice);
        self
    }

    /// Registers multiple slices at once.
    #[must_use]
    pub fn register_slices<I>(mut self, slices: I) -> Self
    where
        I: IntoIterator<Item = InitializedSlice>,
    {
        for slice in slices {
            self.slices.insert(slice.id, slice);
        }
        self
    }

    /// # Errors
    /// Missing config or storage, or a client that cannot be built.
    pub fn build(self) -> Result<PortalState, PortalStateError> {
        let config = self.config.ok_or_else(|| PortalStateError::Validation {
            message: "PortalConfig not provided".into(),
            context: None,
        })?;
        let storage = self.storage.ok_or_else(|| PortalStateError::Validation {
            message: "Storage not provided".into(),
            context: None,
        })?;
        let client = match self.client {
            Some(client) => client,
            None => ApiClient::new(&config.api)?,
        };
        let events = self.events.unwrap_or_default();
        let notifier = self.notifier.unwrap_or_else(|| Notifier::new(events.clone()));

        let session = SessionCache::new(
            storage.namespace("session").context("Session namespace")?,
            config.auth.session_skew_secs,
        );
        let prefs = PreferenceStore::new(storage.namespace("prefs").context("Preference namespace")?);
        let drafts = DraftStore::new(storage.namespace("drafts").context("Draft namespace")?);

        Ok(PortalState {
            inner: Arc::new(PortalStateInner {
                config,
                client,
                events,
                notifier,
                storage,
                session,
                prefs,
                drafts,
                slices: self.slices,
            }),
        })
    }
}
