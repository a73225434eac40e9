use ctn_derive::ctn_error;
use std::borrow::Cow;

#[ctn_error]
pub enum UploadError {
    #[error("Document rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O failure{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err: UploadError = "boom".into();
    assert_eq!(err.kind(), "Internal");
}
