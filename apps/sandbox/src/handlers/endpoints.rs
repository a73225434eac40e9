use crate::error::ApiResult;
use crate::extract::{Caller, Payload};
use crate::state::SandboxState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ctn::domain::constants::ENDPOINTS_TAG;
use ctn::domain::models::{ErrorBody, EndpointPayload, Endpoint};
use ctn_derive::api_handler;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub(crate) fn router() -> OpenApiRouter<SandboxState> {
    OpenApiRouter::new()
        .routes(routes!(list_endpoints, create_endpoint))
        .routes(routes!(update_endpoint, delete_endpoint))
}

#[api_handler(
    get,
    path = "/api/v1/legal-entities/{legal_entity_id}/endpoints",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    responses((status = OK, body = Vec<Endpoint>), (status = NOT_FOUND, body = ErrorBody)),
    tag = ENDPOINTS_TAG,
)]
async fn list_endpoints(
    _caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
) -> ApiResult<Json<Vec<Endpoint>>> {
    Ok(Json(state.read().endpoints(&legal_entity_id)?))
}

#[api_handler(
    post,
    path = "/api/v1/legal-entities/{legal_entity_id}/endpoints",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    request_body = EndpointPayload,
    responses(
        (status = CREATED, body = Endpoint),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = FORBIDDEN, body = ErrorBody),
    ),
    tag = ENDPOINTS_TAG,
)]
async fn create_endpoint(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
    Payload(input): Payload<EndpointPayload>,
) -> ApiResult<(StatusCode, Json<Endpoint>)> {
    let created = state.write().create_endpoint(caller.writer()?, &legal_entity_id, input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[api_handler(
    put,
    path = "/api/v1/endpoints/{endpoint_id}",
    params(("endpoint_id" = String, Path, description = "Endpoint ID")),
    request_body(content = EndpointPayload, description = "Full replacement; `isActive` toggles the endpoint"),
    responses(
        (status = OK, body = Endpoint),
        (status = NOT_FOUND, body = ErrorBody),
        (status = BAD_REQUEST, body = ErrorBody),
    ),
    tag = ENDPOINTS_TAG,
)]
async fn update_endpoint(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(endpoint_id): Path<String>,
    Payload(input): Payload<EndpointPayload>,
) -> ApiResult<Json<Endpoint>> {
    Ok(Json(state.write().update_endpoint(caller.writer()?, &endpoint_id, input)?))
}

#[api_handler(
    delete,
    path = "/api/v1/endpoints/{endpoint_id}",
    params(("endpoint_id" = String, Path, description = "Endpoint ID")),
    responses((status = NO_CONTENT), (status = NOT_FOUND, body = ErrorBody)),
    tag = ENDPOINTS_TAG,
)]
async fn delete_endpoint(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(endpoint_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.write().delete_endpoint(caller.writer()?, &endpoint_id)?;
    Ok(StatusCode::NO_CONTENT)
}
