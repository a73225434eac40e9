//! KvK verification feature slice.
//!
//! Upload a KvK extract for a legal entity, poll until the backend finished extracting it,
//! compare entered and extracted registry fields, and review flagged verifications.

pub mod comparison;
pub mod document;
mod error;
pub mod poll;

pub use comparison::{ComparisonRow, RowStatus, comparison};
pub use error::{VerificationError, VerificationErrorExt};
pub use poll::PollPolicy;

use ctn_kernel::client::{ApiClient, ClientError};
use ctn_kernel::domain::config::VerificationConfig;
use ctn_kernel::domain::models::{KvkVerification, ReviewDecision, ReviewRequest};
use ctn_kernel::domain::registry::InitializedSlice;
use ctn_kernel::notify::Notifier;
use std::path::Path;
use tracing::{info, warn};

/// Verification feature state.
#[ctn_derive::ctn_slice]
pub struct Verification {
    client: ApiClient,
    notifier: Notifier,
    config: VerificationConfig,
}

/// Initialize the verification feature.
#[must_use]
pub fn init(client: ApiClient, notifier: Notifier, config: VerificationConfig) -> InitializedSlice {
    info!(max_upload_bytes = config.max_upload_bytes, "Verification slice initialized");
    InitializedSlice::new(Verification::new(VerificationInner { client, notifier, config }))
}

impl Verification {
    #[must_use]
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::from(&self.config)
    }

    /// Checks and uploads a document (multipart field `file`). The backend answers 202 with the
    /// new pending verification.
    pub async fn upload(
        &self,
        legal_entity_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<KvkVerification, VerificationError> {
        document::check_document(file_name, &bytes, self.config.max_upload_bytes)?;

        let verification: KvkVerification = self
            .client
            .upload(
                &format!("/legal-entities/{legal_entity_id}/kvk-document"),
                file_name,
                document::PDF_MIME,
                bytes,
            )
            .await?;

        info!(legal_entity_id, verification_id = %verification.verification_id, "KvK document uploaded");
        self.notifier.success(format!("{file_name} uploaded; verification started"));
        Ok(verification)
    }

    /// Reads `path` and uploads it under its file name.
    pub async fn upload_file(&self, legal_entity_id: &str, path: &Path) -> Result<KvkVerification, VerificationError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| VerificationError::InvalidDocument {
                message: format!("{} has no usable file name", path.display()).into(),
                context: None,
            })?
            .to_owned();
        let size = tokio::fs::metadata(path).await.context(path.display().to_string())?.len();
        document::check_size(&file_name, size, self.config.max_upload_bytes)?;

        let bytes = tokio::fs::read(path).await.context(path.display().to_string())?;
        self.upload(legal_entity_id, &file_name, bytes).await
    }

    /// Latest verification, `None` when nothing was uploaded yet.
    pub async fn status(&self, legal_entity_id: &str) -> Result<Option<KvkVerification>, VerificationError> {
        match self.client.get(&format!("/legal-entities/{legal_entity_id}/kvk-verification")).await {
            Ok(verification) => Ok(Some(verification)),
            Err(ClientError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Re-fetches the status until it is terminal.
    pub async fn poll(&self, legal_entity_id: &str, policy: PollPolicy) -> Result<KvkVerification, VerificationError> {
        let result = poll::poll_until(policy, || async {
            match self.status(legal_entity_id).await {
                Ok(Some(verification)) => Ok(verification),
                Ok(None) => Err(VerificationError::InvalidDocument {
                    message: "no document uploaded".into(),
                    context: None,
                }),
                Err(e) => Err(e),
            }
        })
        .await;

        match &result {
            Ok(v) => info!(legal_entity_id, status = %v.status, "Verification finished"),
            Err(e) => warn!(legal_entity_id, error.kind = e.kind(), "Verification polling stopped"),
        }
        result
    }

    /// Verifications waiting for manual review.
    pub async fn flagged(&self) -> Result<Vec<KvkVerification>, VerificationError> {
        Ok(self.client.get("/kvk-verification/flagged").await?)
    }

    /// Rejections need a note explaining why.
    pub async fn review(
        &self,
        verification_id: &str,
        decision: ReviewDecision,
        notes: Option<&str>,
    ) -> Result<KvkVerification, VerificationError> {
        let request = review_request(decision, notes)?;
        let reviewed: KvkVerification = self
            .client
            .post(&format!("/kvk-verification/{verification_id}/review"), &request)
            .await?;

        info!(verification_id, %decision, "Verification reviewed");
        self.notifier.success(format!("Verification {}", decision.to_string().to_lowercase()));
        Ok(reviewed)
    }
}

/// # Errors
/// A rejection without notes.
pub fn review_request(decision: ReviewDecision, notes: Option<&str>) -> Result<ReviewRequest, VerificationError> {
    let notes = notes.map(str::trim).filter(|n| !n.is_empty()).map(str::to_owned);
    if decision == ReviewDecision::Rejected && notes.is_none() {
        return Err(VerificationError::InvalidReview {
            message: "add a note explaining the rejection".into(),
            context: None,
        });
    }
    Ok(ReviewRequest { decision, notes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_need_notes() {
        assert!(review_request(ReviewDecision::Rejected, Some("  ")).is_err());
        assert!(review_request(ReviewDecision::Approved, None).is_ok());
        let request = review_request(ReviewDecision::Rejected, Some(" name differs ")).expect("valid");
        assert_eq!(request.notes.as_deref(), Some("name differs"));
    }
}
