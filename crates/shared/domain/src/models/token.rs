use crate::constants::TOKEN_DEFAULT_DAYS;
use crate::grid::GridRow;
use chrono::{DateTime, Utc};
use ctn_derive::api_model;

/// Endpoint access credential. The secret itself is never listed.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq, GridRow)]
#[grid(id = "token_id")]
pub struct Token {
    #[grid(label = "Token ID", sortable)]
    pub token_id: String,
    pub endpoint_id: String,
    #[grid(label = "Prefix", sortable)]
    pub prefix: String,
    #[grid(label = "Created", sortable)]
    pub created_at: DateTime<Utc>,
    #[grid(label = "Expires", sortable)]
    pub expires_at: DateTime<Utc>,
    #[grid(label = "Last used", sortable)]
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[grid(label = "Revoked", sortable)]
    #[serde(default)]
    pub revoked: bool,
}

impl Token {
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IssueToken {
    pub expires_in_days: u32,
}

impl Default for IssueToken {
    fn default() -> Self {
        Self { expires_in_days: TOKEN_DEFAULT_DAYS }
    }
}

/// Issuance response; `secret` is only ever returned here.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: Token,
    pub secret: String,
}
