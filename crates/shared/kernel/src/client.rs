//! Register REST client.
//!
//! Thin wrapper over `reqwest` that attaches the session credentials, serializes JSON bodies and
//! maps non-2xx responses onto [`ClientError`] variants. No retries, no deduplication: every
//! call is one request.

use crate::domain::config::ApiConfig;
use crate::domain::constants::{API_PREFIX, PORTAL_USER_HEADER};
use crate::domain::models::ErrorBody;
use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, StatusCode, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[ctn_derive::ctn_error]
pub enum ClientError {
    /// 400 / 422.
    #[error("{message}{}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// 401: the session is missing or expired.
    #[error("Sign-in required: {message}{}", format_context(.context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Forbidden: {message}{}", format_context(.context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not found: {message}{}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Conflict: {message}{}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// 5xx.
    #[error("Server error: {message}{}", format_context(.context))]
    Server { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Any other non-2xx status.
    #[error("Unexpected response: {message}{}", format_context(.context))]
    Unexpected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Network error{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Malformed response{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal client error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ClientError {
    /// Maps a non-success status and its body onto a variant. The `{ "error": .. }` message is
    /// kept verbatim; other bodies fall back to their text, then to the canonical reason.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message: Cow<'static, str> = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .ok()
            .or_else(|| {
                let text = body.trim();
                (!text.is_empty()).then(|| text.to_owned())
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("no reason").to_owned())
            .into();
        let context = None;

        match status.as_u16() {
            400 | 422 => Self::Validation { message, context },
            401 => Self::Unauthorized { message, context },
            403 => Self::Forbidden { message, context },
            404 => Self::NotFound { message, context },
            409 => Self::Conflict { message, context },
            500..=599 => Self::Server { message, context },
            code => Self::Unexpected { message: format!("HTTP {code}: {message}").into(), context },
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Bearer token and account attached to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub account: String,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    credentials: RwLock<Option<Credentials>>,
}

/// Cloneable register API client; clones share credentials.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// # Errors
    /// [`ClientError::Transport`] when the TLS backend cannot be initialized.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("ctn-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                credentials: RwLock::new(None),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn set_credentials(&self, credentials: Option<Credentials>) {
        *self.inner.credentials.write() = credentials;
    }

    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        self.inner.credentials.read().clone()
    }

    /// Absolute URL of an API route (`/members` becomes `<base>/api/v1/members`).
    #[must_use]
    pub fn url(&self, route: &str) -> String {
        format!("{}{API_PREFIX}{route}", self.inner.base_url)
    }

    pub async fn get<T: DeserializeOwned>(&self, route: &str) -> Result<T, ClientError> {
        self.send_json(self.request(Method::GET, route)).await
    }

    pub async fn get_query<T, Q>(&self, route: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::GET, route).query(query)).await
    }

    pub async fn post<T, B>(&self, route: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::POST, route).json(body)).await
    }

    pub async fn put<T, B>(&self, route: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::PUT, route).json(body)).await
    }

    /// DELETE; any response body is ignored.
    pub async fn delete(&self, route: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, route)).await.map(|_| ())
    }

    /// Uploads a single file as multipart field `file`.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        route: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<T, ClientError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(mime)
            .context("Invalid upload content type")?;
        let form = multipart::Form::new().part("file", part);
        self.send_json(self.request(Method::POST, route).multipart(form)).await
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let url = self.url(route);
        debug!(%method, %url, "API request");
        let builder = self.inner.http.request(method, url);
        match self.credentials() {
            Some(c) => builder.bearer_auth(c.token).header(PORTAL_USER_HEADER, c.account),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ClientError> {
        let response = request.send().await.context("Request failed")?;
        let status = response.status();
        let body = response.text().await.context("Reading response body")?;

        if status.is_success() {
            Ok(body)
        } else {
            let err = ClientError::from_status(status, &body);
            warn!(status = status.as_u16(), error.kind = err.kind(), "API call failed");
            Err(err)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).context("Decoding response JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_variants() {
        let cases = [
            (400, "Validation"),
            (422, "Validation"),
            (401, "Unauthorized"),
            (403, "Forbidden"),
            (404, "NotFound"),
            (409, "Conflict"),
            (500, "Server"),
            (503, "Server"),
            (418, "Unexpected"),
        ];
        for (code, kind) in cases {
            let status = StatusCode::from_u16(code).expect("valid status");
            assert_eq!(ClientError::from_status(status, "").kind(), kind, "status {code}");
        }
    }

    #[test]
    fn error_body_message_is_kept_verbatim() {
        let err = ClientError::from_status(
            StatusCode::CONFLICT,
            r#"{"error":"Organization ID org:acme already exists"}"#,
        );
        assert_eq!(err.to_string(), "Conflict: Organization ID org:acme already exists");
    }

    #[test]
    fn plain_and_empty_bodies_fall_back() {
        let plain = ClientError::from_status(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(plain.to_string(), "Server error: upstream down");

        let empty = ClientError::from_status(StatusCode::NOT_FOUND, "  ");
        assert_eq!(empty.to_string(), "Not found: Not Found");
    }

    #[test]
    fn urls_are_rooted_under_the_api_prefix() -> Result<(), ClientError> {
        let config = ApiConfig { base_url: "http://127.0.0.1:4583/".into(), timeout_secs: 5 };
        let client = ApiClient::new(&config)?;
        assert_eq!(client.url("/members"), "http://127.0.0.1:4583/api/v1/members");
        Ok(())
    }

    #[test]
    fn clones_share_credentials() -> Result<(), ClientError> {
        let client = ApiClient::new(&ApiConfig::default())?;
        let clone = client.clone();
        client.set_credentials(Some(Credentials { token: "t".into(), account: "a".into() }));
        assert_eq!(clone.credentials().map(|c| c.account), Some("a".to_owned()));
        Ok(())
    }
}
