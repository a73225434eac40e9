use crate::error::ApiResult;
use crate::extract::{Caller, Payload};
use crate::state::SandboxState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ctn::domain::constants::TOKENS_TAG;
use ctn::domain::models::{ErrorBody, IssueToken, IssuedToken, Token};
use ctn_derive::api_handler;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub(crate) fn router() -> OpenApiRouter<SandboxState> {
    OpenApiRouter::new().routes(routes!(list_tokens, issue_token)).routes(routes!(revoke_token))
}

#[api_handler(
    get,
    path = "/api/v1/endpoints/{endpoint_id}/tokens",
    params(("endpoint_id" = String, Path, description = "Endpoint ID")),
    responses((status = OK, body = Vec<Token>), (status = NOT_FOUND, body = ErrorBody)),
    tag = TOKENS_TAG,
)]
async fn list_tokens(
    _caller: Caller,
    State(state): State<SandboxState>,
    Path(endpoint_id): Path<String>,
) -> ApiResult<Json<Vec<Token>>> {
    Ok(Json(state.read().tokens(&endpoint_id)?))
}

#[api_handler(
    post,
    path = "/api/v1/endpoints/{endpoint_id}/tokens",
    params(("endpoint_id" = String, Path, description = "Endpoint ID")),
    request_body = IssueToken,
    responses(
        (status = CREATED, description = "The secret is only returned here", body = IssuedToken),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = TOKENS_TAG,
)]
async fn issue_token(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(endpoint_id): Path<String>,
    Payload(input): Payload<IssueToken>,
) -> ApiResult<(StatusCode, Json<IssuedToken>)> {
    let issued = state.write().issue_token(caller.writer()?, &endpoint_id, input)?;
    Ok((StatusCode::CREATED, Json(issued)))
}

#[api_handler(
    delete,
    path = "/api/v1/tokens/{token_id}",
    params(("token_id" = String, Path, description = "Token ID")),
    responses(
        (status = NO_CONTENT),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, description = "Already revoked", body = ErrorBody),
    ),
    tag = TOKENS_TAG,
)]
async fn revoke_token(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(token_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.write().revoke_token(caller.writer()?, &token_id)?;
    Ok(StatusCode::NO_CONTENT)
}
