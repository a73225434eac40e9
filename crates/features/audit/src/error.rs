use ctn_kernel::client::ClientError;
use std::borrow::Cow;

/// Audit slice error type.
#[ctn_derive::ctn_error]
pub enum AuditError {
    #[error("Invalid audit query{}: {message}", format_context(.context))]
    InvalidQuery { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Client { source: ClientError, context: Option<Cow<'static, str>> },
}
