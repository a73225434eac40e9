//! Endpoint tokens feature slice.
//!
//! Issued secrets are returned once by [`Tokens::issue`] and never listed again.

mod error;

pub use error::{TokensError, TokensErrorExt};

use ctn_kernel::client::ApiClient;
use ctn_kernel::domain::constants::TOKEN_MAX_DAYS;
use ctn_kernel::domain::models::{IssueToken, IssuedToken, Token};
use ctn_kernel::domain::registry::InitializedSlice;
use ctn_kernel::notify::Notifier;
use tracing::info;

/// Tokens feature state.
#[ctn_derive::ctn_slice]
pub struct Tokens {
    client: ApiClient,
    notifier: Notifier,
}

/// Initialize the tokens feature.
#[must_use]
pub fn init(client: ApiClient, notifier: Notifier) -> InitializedSlice {
    info!("Tokens slice initialized");
    InitializedSlice::new(Tokens::new(TokensInner { client, notifier }))
}

/// # Errors
/// Lifetimes outside `1..=365` days.
pub fn validate_lifetime(days: u32) -> Result<IssueToken, TokensError> {
    if (1..=TOKEN_MAX_DAYS).contains(&days) {
        Ok(IssueToken { expires_in_days: days })
    } else {
        Err(TokensError::InvalidLifetime {
            message: format!("{days} days; choose between 1 and {TOKEN_MAX_DAYS}").into(),
            context: None,
        })
    }
}

impl Tokens {
    pub async fn list(&self, endpoint_id: &str) -> Result<Vec<Token>, TokensError> {
        Ok(self.client.get(&format!("/endpoints/{endpoint_id}/tokens")).await?)
    }

    /// `None` issues with the default lifetime.
    pub async fn issue(&self, endpoint_id: &str, expires_in_days: Option<u32>) -> Result<IssuedToken, TokensError> {
        let body = expires_in_days.map_or_else(|| Ok(IssueToken::default()), validate_lifetime)?;
        let issued: IssuedToken = self.client.post(&format!("/endpoints/{endpoint_id}/tokens"), &body).await?;

        info!(endpoint_id, token_id = %issued.token.token_id, days = body.expires_in_days, "Token issued");
        self.notifier.success(format!("Token {} issued; copy the secret now", issued.token.prefix));
        Ok(issued)
    }

    pub async fn revoke(&self, token_id: &str) -> Result<(), TokensError> {
        self.client.delete(&format!("/tokens/{token_id}")).await?;

        info!(token_id, "Token revoked");
        self.notifier.success("Token revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctn_kernel::domain::constants::TOKEN_DEFAULT_DAYS;

    #[test]
    fn lifetime_bounds() {
        assert!(validate_lifetime(0).is_err());
        assert_eq!(validate_lifetime(1).map(|b| b.expires_in_days).ok(), Some(1));
        assert!(validate_lifetime(TOKEN_MAX_DAYS).is_ok());
        let err = validate_lifetime(TOKEN_MAX_DAYS + 1).expect_err("too long");
        assert_eq!(err.kind(), "InvalidLifetime");
        assert_eq!(IssueToken::default().expires_in_days, TOKEN_DEFAULT_DAYS);
    }
}
