use crate::error::VerificationError;
use ctn_kernel::domain::config::VerificationConfig;
use ctn_kernel::domain::models::KvkVerification;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often and how long to re-fetch a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl From<&VerificationConfig> for PollPolicy {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            max_attempts: config.max_poll_attempts.max(1),
        }
    }
}

/// Calls `fetch` until the verification reaches a terminal status, sleeping `interval` between
/// attempts.
///
/// # Errors
/// The first fetch error, or [`VerificationError::Timeout`] after `max_attempts` non-terminal
/// results.
pub async fn poll_until<F, Fut>(policy: PollPolicy, mut fetch: F) -> Result<KvkVerification, VerificationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<KvkVerification, VerificationError>>,
{
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        let verification = fetch().await?;
        debug!(attempt, status = %verification.status, "Verification polled");

        if verification.status.is_terminal() {
            return Ok(verification);
        }
        if attempt < attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(VerificationError::Timeout { attempts, context: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ctn_kernel::domain::models::{KvkFields, VerificationStatus};

    fn verification(status: VerificationStatus) -> KvkVerification {
        KvkVerification {
            verification_id: "ver-1".into(),
            legal_entity_id: "le-1".into(),
            document_name: "extract.pdf".into(),
            status,
            uploaded_at: Utc::now(),
            completed_at: None,
            entered: KvkFields::default(),
            extracted: None,
            mismatches: Vec::new(),
            review: None,
        }
    }

    const FAST: PollPolicy = PollPolicy { interval: Duration::from_millis(1), max_attempts: 3 };

    #[tokio::test]
    async fn stops_at_the_first_terminal_status() {
        let mut sequence =
            [VerificationStatus::Pending, VerificationStatus::Processing, VerificationStatus::Flagged].into_iter();
        let mut calls = 0;

        let result = poll_until(FAST, || {
            calls += 1;
            let status = sequence.next().unwrap_or(VerificationStatus::Failed);
            async move { Ok::<_, VerificationError>(verification(status)) }
        })
        .await
        .expect("terminal");

        assert_eq!(result.status, VerificationStatus::Flagged);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn times_out_after_max_attempts() {
        let mut calls = 0;
        let err = poll_until(FAST, || {
            calls += 1;
            async { Ok::<_, VerificationError>(verification(VerificationStatus::Processing)) }
        })
        .await
        .expect_err("never terminal");

        assert!(matches!(err, VerificationError::Timeout { attempts: 3, .. }));
        assert_eq!(err.to_string(), "Verification still running after 3 checks");
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn fetch_errors_end_polling() {
        let err = poll_until(FAST, || async {
            Err::<KvkVerification, _>(VerificationError::InvalidReview { message: "boom".into(), context: None })
        })
        .await
        .expect_err("fetch failed");
        assert_eq!(err.kind(), "InvalidReview");
    }

    #[test]
    fn policy_from_config() {
        let config = VerificationConfig { poll_interval_ms: 250, max_poll_attempts: 0, max_upload_bytes: 1 };
        let policy = PollPolicy::from(&config);
        assert_eq!(policy.interval, Duration::from_millis(250));
        assert_eq!(policy.max_attempts, 1);
    }
}
