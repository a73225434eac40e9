//! Request extractors: the calling account and JSON bodies with `{ "error": .. }` rejections.
//!
//! Portal session tokens are not validated: any non-empty bearer token signs the caller in,
//! and tokens starting with `readonly-` may only read. Endpoint tokens issued by the sandbox
//! (`ctn_` prefix) are checked against their stored digest.

use crate::error::ApiError;
use crate::register::SECRET_PREFIX;
use crate::state::SandboxState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use ctn::domain::constants::{PORTAL_USER_HEADER, READONLY_TOKEN_PREFIX};

const ANONYMOUS: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub account: String,
    pub readonly: bool,
}

impl Caller {
    /// The acting account for a mutation.
    ///
    /// # Errors
    /// [`ApiError::Forbidden`] for read-only tokens.
    pub fn writer(&self) -> Result<&str, ApiError> {
        if self.readonly {
            return Err(ApiError::Forbidden {
                message: "This token is read-only".into(),
                context: None,
            });
        }
        Ok(&self.account)
    }
}

impl FromRequestParts<SandboxState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &SandboxState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized {
                message: "Sign in to continue".into(),
                context: None,
            })?;

        if token.starts_with(SECRET_PREFIX) {
            let token_id = state.write().use_secret(token).ok_or_else(|| ApiError::Unauthorized {
                message: "Token is unknown, revoked or expired".into(),
                context: None,
            })?;
            return Ok(Self { account: format!("token:{token_id}"), readonly: false });
        }

        let account = parts
            .headers
            .get(PORTAL_USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_owned();

        Ok(Self { account, readonly: token.starts_with(READONLY_TOKEN_PREFIX) })
    }
}

/// `Json<T>` whose rejection is an [`ApiError::BadRequest`].
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}
