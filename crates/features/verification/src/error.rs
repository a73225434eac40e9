use ctn_kernel::client::ClientError;
use std::borrow::Cow;

#[ctn_derive::ctn_error]
pub enum VerificationError {
    /// Rejected before upload; nothing was sent.
    #[error("Invalid document{}: {message}", format_context(.context))]
    InvalidDocument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Verification still running after {attempts} checks{}", format_context(.context))]
    Timeout { attempts: u32, context: Option<Cow<'static, str>> },

    #[error("Review not submitted{}: {message}", format_context(.context))]
    InvalidReview { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Cannot read document{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Client { source: ClientError, context: Option<Cow<'static, str>> },
}
