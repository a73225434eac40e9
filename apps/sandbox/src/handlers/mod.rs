//! Register API routes under `/api/v1`.

mod audit;
mod contacts;
mod endpoints;
mod identifiers;
mod members;
mod tokens;
mod verification;

use crate::state::SandboxState;
use utoipa_axum::router::OpenApiRouter;

pub(crate) fn router() -> OpenApiRouter<SandboxState> {
    OpenApiRouter::new()
        .merge(members::router())
        .merge(identifiers::router())
        .merge(contacts::router())
        .merge(endpoints::router())
        .merge(tokens::router())
        .merge(audit::router())
        .merge(verification::router())
}
