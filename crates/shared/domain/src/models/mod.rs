//! DTOs exchanged with the register API.
//!
//! Response types tolerate unknown fields (`deny_unknown_fields = false`) so a newer backend
//! does not break the portal. Request payloads reject them.

mod audit;
mod contact;
mod endpoint;
mod identifier;
mod member;
mod token;
mod verification;

pub use audit::*;
pub use contact::*;
pub use endpoint::*;
pub use identifier::*;
pub use member::*;
pub use token::*;
pub use verification::*;

use ctn_derive::api_model;

/// Error body returned by the register API for every non-2xx status.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}
