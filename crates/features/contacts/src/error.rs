use ctn_kernel::client::ClientError;
use ctn_kernel::forms::FieldErrors;
use std::borrow::Cow;

#[ctn_derive::ctn_error]
pub enum ContactsError {
    #[error("Contact not saved{}: {errors}", format_context(.context))]
    Invalid { errors: FieldErrors, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Client { source: ClientError, context: Option<Cow<'static, str>> },
}

impl From<FieldErrors> for ContactsError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid { errors, context: None }
    }
}
