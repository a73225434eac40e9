use ctn_kernel::client::ClientError;
use ctn_kernel::forms::FieldErrors;
use std::borrow::Cow;

#[ctn_derive::ctn_error]
pub enum MembersError {
    /// The form did not pass client-side checks; nothing was sent.
    #[error("Please fix the highlighted fields{}: {errors}", format_context(.context))]
    Invalid { errors: FieldErrors, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Client { source: ClientError, context: Option<Cow<'static, str>> },
}

impl From<FieldErrors> for MembersError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid { errors, context: None }
    }
}
