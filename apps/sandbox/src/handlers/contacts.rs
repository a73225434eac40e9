use crate::error::ApiResult;
use crate::extract::{Caller, Payload};
use crate::state::SandboxState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ctn::domain::constants::CONTACTS_TAG;
use ctn::domain::models::{ErrorBody, ContactPayload, LegalEntityContact};
use ctn_derive::api_handler;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub(crate) fn router() -> OpenApiRouter<SandboxState> {
    OpenApiRouter::new()
        .routes(routes!(list_contacts, create_contact))
        .routes(routes!(update_contact, delete_contact))
}

#[api_handler(
    get,
    path = "/api/v1/legal-entities/{legal_entity_id}/contacts",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    responses((status = OK, body = Vec<LegalEntityContact>), (status = NOT_FOUND, body = ErrorBody)),
    tag = CONTACTS_TAG,
)]
async fn list_contacts(
    _caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
) -> ApiResult<Json<Vec<LegalEntityContact>>> {
    Ok(Json(state.read().contacts(&legal_entity_id)?))
}

#[api_handler(
    post,
    path = "/api/v1/legal-entities/{legal_entity_id}/contacts",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    request_body = ContactPayload,
    responses(
        (status = CREATED, body = LegalEntityContact),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = FORBIDDEN, body = ErrorBody),
    ),
    tag = CONTACTS_TAG,
)]
async fn create_contact(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
    Payload(input): Payload<ContactPayload>,
) -> ApiResult<(StatusCode, Json<LegalEntityContact>)> {
    let created = state.write().create_contact(caller.writer()?, &legal_entity_id, input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[api_handler(
    put,
    path = "/api/v1/contacts/{contact_id}",
    params(("contact_id" = String, Path, description = "Contact ID")),
    request_body = ContactPayload,
    responses(
        (status = OK, body = LegalEntityContact),
        (status = NOT_FOUND, body = ErrorBody),
        (status = BAD_REQUEST, body = ErrorBody),
    ),
    tag = CONTACTS_TAG,
)]
async fn update_contact(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(contact_id): Path<String>,
    Payload(input): Payload<ContactPayload>,
) -> ApiResult<Json<LegalEntityContact>> {
    Ok(Json(state.write().update_contact(caller.writer()?, &contact_id, input)?))
}

#[api_handler(
    delete,
    path = "/api/v1/contacts/{contact_id}",
    params(("contact_id" = String, Path, description = "Contact ID")),
    responses((status = NO_CONTENT), (status = NOT_FOUND, body = ErrorBody)),
    tag = CONTACTS_TAG,
)]
async fn delete_contact(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(contact_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.write().delete_contact(caller.writer()?, &contact_id)?;
    Ok(StatusCode::NO_CONTENT)
}
