use crate::handlers;
use crate::state::SandboxState;
use axum::Router;
use ctn::domain::constants::{
    AUDIT_TAG, CONTACTS_TAG, ENDPOINTS_TAG, IDENTIFIERS_TAG, MEMBERS_TAG, SYSTEM_TAG, TOKENS_TAG,
    VERIFICATION_TAG,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "CTN register sandbox", description = "In-memory register API for development and tests"),
    tags(
        (name = SYSTEM_TAG),
        (name = MEMBERS_TAG),
        (name = IDENTIFIERS_TAG),
        (name = CONTACTS_TAG),
        (name = ENDPOINTS_TAG),
        (name = TOKENS_TAG),
        (name = AUDIT_TAG),
        (name = VERIFICATION_TAG),
    )
)]
struct ApiDoc;

/// The full application router: register routes, `/health` and the Scalar docs at `/api`.
pub fn init(state: SandboxState) -> Router {
    let api = ApiDoc::openapi();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(ctn::server::router::system_router())
        .merge(handlers::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Router::new().merge(openapi_routes).merge(scalar_routes)
}
