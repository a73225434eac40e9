use crate::error::ApiResult;
use crate::extract::{Caller, Payload};
use crate::state::SandboxState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ctn::domain::constants::IDENTIFIERS_TAG;
use ctn::domain::models::{ErrorBody, IdentifierPayload, LegalEntityIdentifier};
use ctn_derive::api_handler;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub(crate) fn router() -> OpenApiRouter<SandboxState> {
    OpenApiRouter::new()
        .routes(routes!(list_identifiers, create_identifier))
        .routes(routes!(update_identifier, delete_identifier))
}

#[api_handler(
    get,
    path = "/api/v1/legal-entities/{legal_entity_id}/identifiers",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    responses((status = OK, body = Vec<LegalEntityIdentifier>), (status = NOT_FOUND, body = ErrorBody)),
    tag = IDENTIFIERS_TAG,
)]
async fn list_identifiers(
    _caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
) -> ApiResult<Json<Vec<LegalEntityIdentifier>>> {
    Ok(Json(state.read().identifiers(&legal_entity_id)?))
}

#[api_handler(
    post,
    path = "/api/v1/legal-entities/{legal_entity_id}/identifiers",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    request_body = IdentifierPayload,
    responses(
        (status = CREATED, body = LegalEntityIdentifier),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = CONFLICT, description = "Type and value already registered", body = ErrorBody),
    ),
    tag = IDENTIFIERS_TAG,
)]
async fn create_identifier(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
    Payload(input): Payload<IdentifierPayload>,
) -> ApiResult<(StatusCode, Json<LegalEntityIdentifier>)> {
    let created = state.write().create_identifier(caller.writer()?, &legal_entity_id, input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[api_handler(
    put,
    path = "/api/v1/identifiers/{identifier_id}",
    params(("identifier_id" = String, Path, description = "Identifier ID")),
    request_body = IdentifierPayload,
    responses(
        (status = OK, body = LegalEntityIdentifier),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, body = ErrorBody),
    ),
    tag = IDENTIFIERS_TAG,
)]
async fn update_identifier(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(identifier_id): Path<String>,
    Payload(input): Payload<IdentifierPayload>,
) -> ApiResult<Json<LegalEntityIdentifier>> {
    Ok(Json(state.write().update_identifier(caller.writer()?, &identifier_id, input)?))
}

#[api_handler(
    delete,
    path = "/api/v1/identifiers/{identifier_id}",
    params(("identifier_id" = String, Path, description = "Identifier ID")),
    responses((status = NO_CONTENT), (status = NOT_FOUND, body = ErrorBody)),
    tag = IDENTIFIERS_TAG,
)]
async fn delete_identifier(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(identifier_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.write().delete_identifier(caller.writer()?, &identifier_id)?;
    Ok(StatusCode::NO_CONTENT)
}
