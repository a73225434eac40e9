use crate::error::ApiResult;
use crate::extract::{Caller, Payload};
use crate::state::SandboxState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ctn::domain::constants::MEMBERS_TAG;
use ctn::domain::models::{CreateMember, ErrorBody, LegalEntity, Member, UpdateLegalEntity, UpdateMember};
use ctn_derive::api_handler;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub(crate) fn router() -> OpenApiRouter<SandboxState> {
    OpenApiRouter::new()
        .routes(routes!(list_members, create_member))
        .routes(routes!(get_member, update_member, delete_member))
        .routes(routes!(get_legal_entity, update_legal_entity))
}

#[api_handler(
    get,
    path = "/api/v1/members",
    responses(
        (status = OK, body = Vec<Member>),
        (status = UNAUTHORIZED, body = ErrorBody),
    ),
    tag = MEMBERS_TAG,
)]
async fn list_members(_caller: Caller, State(state): State<SandboxState>) -> Json<Vec<Member>> {
    Json(state.read().members())
}

#[api_handler(
    post,
    path = "/api/v1/members",
    request_body = CreateMember,
    responses(
        (status = CREATED, body = Member),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = FORBIDDEN, body = ErrorBody),
        (status = CONFLICT, description = "Organization ID already registered", body = ErrorBody),
    ),
    tag = MEMBERS_TAG,
)]
async fn create_member(
    caller: Caller,
    State(state): State<SandboxState>,
    Payload(input): Payload<CreateMember>,
) -> ApiResult<(StatusCode, Json<Member>)> {
    let member = state.write().create_member(caller.writer()?, input)?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[api_handler(
    get,
    path = "/api/v1/members/{member_id}",
    params(("member_id" = String, Path, description = "Member ID")),
    responses((status = OK, body = Member), (status = NOT_FOUND, body = ErrorBody)),
    tag = MEMBERS_TAG,
)]
async fn get_member(
    _caller: Caller,
    State(state): State<SandboxState>,
    Path(member_id): Path<String>,
) -> ApiResult<Json<Member>> {
    Ok(Json(state.read().member(&member_id)?))
}

#[api_handler(
    put,
    path = "/api/v1/members/{member_id}",
    params(("member_id" = String, Path, description = "Member ID")),
    request_body = UpdateMember,
    responses(
        (status = OK, body = Member),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = MEMBERS_TAG,
)]
async fn update_member(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(member_id): Path<String>,
    Payload(input): Payload<UpdateMember>,
) -> ApiResult<Json<Member>> {
    Ok(Json(state.write().update_member(caller.writer()?, &member_id, input)?))
}

#[api_handler(
    delete,
    path = "/api/v1/members/{member_id}",
    params(("member_id" = String, Path, description = "Member ID")),
    responses((status = NO_CONTENT), (status = NOT_FOUND, body = ErrorBody)),
    tag = MEMBERS_TAG,
)]
async fn delete_member(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(member_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.write().delete_member(caller.writer()?, &member_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    get,
    path = "/api/v1/legal-entities/{legal_entity_id}",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    responses((status = OK, body = LegalEntity), (status = NOT_FOUND, body = ErrorBody)),
    tag = MEMBERS_TAG,
)]
async fn get_legal_entity(
    _caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
) -> ApiResult<Json<LegalEntity>> {
    Ok(Json(state.read().legal_entity(&legal_entity_id)?))
}

#[api_handler(
    put,
    path = "/api/v1/legal-entities/{legal_entity_id}",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    request_body = UpdateLegalEntity,
    responses(
        (status = OK, body = LegalEntity),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = MEMBERS_TAG,
)]
async fn update_legal_entity(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
    Payload(input): Payload<UpdateLegalEntity>,
) -> ApiResult<Json<LegalEntity>> {
    Ok(Json(state.write().update_legal_entity(caller.writer()?, &legal_entity_id, input)?))
}
