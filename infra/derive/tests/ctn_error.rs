use ctn_derive::ctn_error;
use std::borrow::Cow;

#[ctn_error]
pub enum DraftError {
    #[error("Draft missing{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Draft unreadable{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal draft error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_draft(found: bool) -> Result<&'static str, std::io::Error> {
    if found { Ok("{}") } else { Err(std::io::Error::other("gone")) }
}

#[test]
fn ctn_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/ctn_error_pass.rs");
}

#[test]
fn context_is_rendered_in_display() {
    let err = read_draft(false).context("Loading identifier draft").unwrap_err();
    assert_eq!(err.kind(), "Io");
    assert_eq!(err.to_string(), "Draft unreadable (Loading identifier draft): gone");
}

#[test]
fn context_overrides_on_own_result() {
    let res: Result<(), DraftError> =
        Err(DraftError::Missing { message: "identifiers".into(), context: None });
    let err = res.context("resume requested").unwrap_err();
    assert_eq!(err.to_string(), "Draft missing (resume requested): identifiers");
}

#[test]
fn strings_convert_into_internal() {
    let err: DraftError = String::from("bad state").into();
    assert_eq!(err.kind(), "Internal");
    assert_eq!(err.to_string(), "Internal draft error: bad state");
}

#[test]
fn source_converts_with_question_mark() {
    fn load() -> Result<&'static str, DraftError> {
        Ok(read_draft(false)?)
    }
    assert!(matches!(load(), Err(DraftError::Io { context: None, .. })));
}
