use super::Register;
use crate::error::{ApiError, ApiResult};
use chrono::{Duration, Utc};
use ctn::domain::constants::{TOKEN_MAX_DAYS, TOKEN_PREFIX_LEN};
use ctn::domain::models::{AuditAction, IssueToken, IssuedToken, Token};
use ctn::kernel::safe_nanoid;
use sha2::{Digest, Sha256};

/// Prefix of every issued secret; bearer tokens with it are looked up by digest.
pub const SECRET_PREFIX: &str = "ctn_";
const SECRET_LEN: usize = 40;

/// A token and the SHA-256 digest of its secret. The secret itself is never kept.
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub token: Token,
    pub secret_digest: String,
}

/// Hex SHA-256 of a secret.
#[must_use]
pub fn digest(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl Register {
    pub fn tokens(&self, endpoint_id: &str) -> ApiResult<Vec<Token>> {
        self.endpoint_exists(endpoint_id)?;
        Ok(self.tokens.iter().filter(|t| t.token.endpoint_id == endpoint_id).map(|t| t.token.clone()).collect())
    }

    /// Issues a token; the secret is only part of this response.
    pub fn issue_token(&mut self, actor: &str, endpoint_id: &str, input: IssueToken) -> ApiResult<IssuedToken> {
        self.endpoint_exists(endpoint_id)?;
        if !(1..=TOKEN_MAX_DAYS).contains(&input.expires_in_days) {
            return Err(ApiError::bad_request(format!(
                "expiresInDays must be between 1 and {TOKEN_MAX_DAYS}"
            )));
        }

        let secret = format!("{SECRET_PREFIX}{}", safe_nanoid!(SECRET_LEN));
        let now = Utc::now();
        let token = Token {
            token_id: safe_nanoid!(),
            endpoint_id: endpoint_id.to_owned(),
            prefix: secret.chars().take(TOKEN_PREFIX_LEN).collect(),
            created_at: now,
            expires_at: now + Duration::days(i64::from(input.expires_in_days)),
            last_used_at: None,
            revoked: false,
        };
        self.tokens.push(StoredToken { token: token.clone(), secret_digest: digest(&secret) });
        self.record(
            actor,
            AuditAction::Issue,
            "Token",
            &token.token_id,
            format!("Issued token {} valid for {} days", token.prefix, input.expires_in_days),
        );
        Ok(IssuedToken { token, secret })
    }

    /// Revoked tokens stay listed.
    pub fn revoke_token(&mut self, actor: &str, token_id: &str) -> ApiResult<()> {
        let stored = self
            .tokens
            .iter_mut()
            .find(|t| t.token.token_id == token_id)
            .ok_or_else(|| ApiError::not_found("Token", token_id))?;
        if stored.token.revoked {
            return Err(ApiError::conflict(format!("Token {} is already revoked", stored.token.prefix)));
        }
        stored.token.revoked = true;
        let prefix = stored.token.prefix.clone();
        self.record(actor, AuditAction::Revoke, "Token", token_id, format!("Revoked token {prefix}"));
        Ok(())
    }

    /// Token id of a usable secret; stamps `lastUsedAt`.
    pub fn use_secret(&mut self, secret: &str) -> Option<String> {
        let now = Utc::now();
        let wanted = digest(secret);
        let stored = self.tokens.iter_mut().find(|t| t.secret_digest == wanted)?;
        if !stored.token.is_usable(now) {
            return None;
        }
        stored.token.last_used_at = Some(now);
        Some(stored.token.token_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::tests::acme;
    use ctn::domain::models::EndpointPayload;

    fn endpoint(register: &mut Register) -> ApiResult<String> {
        let member = register.create_member("admin", acme())?;
        let input = EndpointPayload {
            endpoint_name: "Tracking".into(),
            endpoint_url: "https://api.acme.nl/track".into(),
            ..EndpointPayload::default()
        };
        Ok(register.create_endpoint("admin", &member.legal_entity_id, input)?.endpoint_id)
    }

    #[test]
    fn only_the_digest_is_stored() -> ApiResult<()> {
        let mut register = Register::default();
        let endpoint_id = endpoint(&mut register)?;
        let issued = register.issue_token("admin", &endpoint_id, IssueToken::default())?;

        assert!(issued.secret.starts_with(SECRET_PREFIX));
        assert_eq!(issued.token.prefix, issued.secret[..TOKEN_PREFIX_LEN]);
        let stored = &register.tokens[0];
        assert_eq!(stored.secret_digest, digest(&issued.secret));
        assert_eq!(stored.secret_digest.len(), 64);
        assert_ne!(stored.secret_digest, issued.secret);
        Ok(())
    }

    #[test]
    fn lifetime_is_bounded() -> ApiResult<()> {
        let mut register = Register::default();
        let endpoint_id = endpoint(&mut register)?;
        for days in [0, TOKEN_MAX_DAYS + 1] {
            let err = register.issue_token("admin", &endpoint_id, IssueToken { expires_in_days: days });
            assert!(matches!(err, Err(ApiError::BadRequest { .. })), "{days} days");
        }
        Ok(())
    }

    #[test]
    fn revoked_secrets_stop_working() -> ApiResult<()> {
        let mut register = Register::default();
        let endpoint_id = endpoint(&mut register)?;
        let issued = register.issue_token("admin", &endpoint_id, IssueToken::default())?;

        assert_eq!(register.use_secret(&issued.secret), Some(issued.token.token_id.clone()));
        assert!(register.tokens(&endpoint_id)?[0].last_used_at.is_some());

        register.revoke_token("admin", &issued.token.token_id)?;
        assert_eq!(register.use_secret(&issued.secret), None);
        assert!(register.tokens(&endpoint_id)?[0].revoked);
        assert!(matches!(
            register.revoke_token("admin", &issued.token.token_id),
            Err(ApiError::Conflict { .. })
        ));
        Ok(())
    }
}
