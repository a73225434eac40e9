//! Cached sign-in session.
//!
//! The token is acquired by the external identity provider; the portal only stores it, checks
//! its expiry and attaches it to API calls.

use chrono::{DateTime, Duration, Utc};
use ctn_storage::{NamespacedStorage, StorageError};
use serde::{Deserialize, Serialize};
use tracing::debug;

const SESSION_KEY: &str = "current";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub account: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Valid when it expires later than `now + skew`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>, skew_secs: u64) -> bool {
        let skew = Duration::seconds(i64::try_from(skew_secs).unwrap_or(i64::MAX / 1000));
        !self.token.trim().is_empty() && self.expires_at > now + skew
    }
}

#[derive(Debug, Clone)]
pub struct SessionCache {
    store: NamespacedStorage,
    skew_secs: u64,
}

impl SessionCache {
    #[must_use]
    pub const fn new(store: NamespacedStorage, skew_secs: u64) -> Self {
        Self { store, skew_secs }
    }

    /// The cached session, whether or not it is still valid.
    pub async fn load(&self) -> Result<Option<Session>, StorageError> {
        self.store.get(SESSION_KEY).await
    }

    /// The cached session if it is valid now. A corrupt cache reads as signed out.
    pub async fn current(&self) -> Option<Session> {
        match self.load().await {
            Ok(Some(session)) if session.is_valid_at(Utc::now(), self.skew_secs) => Some(session),
            Ok(Some(_)) => {
                debug!("Cached session expired");
                None
            },
            Ok(None) => None,
            Err(e) => {
                debug!(error = %e, "Session cache unreadable");
                None
            },
        }
    }

    pub async fn store(&self, session: &Session) -> Result<(), StorageError> {
        self.store.put(SESSION_KEY, session).await
    }

    /// Returns whether a session was cached.
    pub async fn clear(&self) -> Result<bool, StorageError> {
        self.store.remove(SESSION_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in: i64) -> Session {
        Session {
            token: "token".into(),
            account: "admin@ctn.example".into(),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    #[test]
    fn skew_shortens_validity() {
        let now = Utc::now();
        assert!(session(3600).is_valid_at(now, 60));
        assert!(!session(30).is_valid_at(now, 60));
        assert!(session(30).is_valid_at(now, 0));
        assert!(!session(-1).is_valid_at(now, 0));
    }

    #[test]
    fn blank_token_is_never_valid() {
        let mut s = session(3600);
        s.token = "  ".into();
        assert!(!s.is_valid_at(Utc::now(), 0));
    }
}
