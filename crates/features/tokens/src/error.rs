use ctn_kernel::client::ClientError;
use std::borrow::Cow;

#[ctn_derive::ctn_error]
pub enum TokensError {
    #[error("Invalid token lifetime{}: {message}", format_context(.context))]
    InvalidLifetime { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Client { source: ClientError, context: Option<Cow<'static, str>> },
}
