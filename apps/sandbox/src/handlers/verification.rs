use crate::error::{ApiError, ApiResult};
use crate::extract::{Caller, Payload};
use crate::state::SandboxState;
use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use ctn::domain::constants::VERIFICATION_TAG;
use ctn::domain::models::{ErrorBody, KvkVerification, ReviewRequest};
use ctn_derive::api_handler;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Above the portal's 10 MiB document limit so the portal's own check is what users see.
const UPLOAD_BODY_LIMIT: usize = 16 * 1024 * 1024;
const DOCUMENT_FIELD: &str = "file";

pub(crate) fn router() -> OpenApiRouter<SandboxState> {
    OpenApiRouter::new()
        .routes(routes!(upload_document))
        .routes(routes!(latest_verification))
        .routes(routes!(flagged_verifications))
        .routes(routes!(review_verification))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

#[api_handler(
    post,
    path = "/api/v1/legal-entities/{legal_entity_id}/kvk-document",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    responses(
        (status = ACCEPTED, description = "Verification started", body = KvkVerification),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = VERIFICATION_TAG,
)]
async fn upload_document(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<KvkVerification>)> {
    let actor = caller.writer()?.to_owned();

    let mut document = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::bad_request(e.body_text()))? {
        if field.name() == Some(DOCUMENT_FIELD) {
            let file_name = field.file_name().unwrap_or("document.pdf").to_owned();
            let bytes = field.bytes().await.map_err(|e| ApiError::bad_request(e.body_text()))?;
            document = Some((file_name, bytes));
            break;
        }
    }
    let (file_name, bytes) =
        document.ok_or_else(|| ApiError::bad_request(format!("Multipart field '{DOCUMENT_FIELD}' is required")))?;

    let created = state.write().upload_document(&actor, &legal_entity_id, &file_name, &bytes)?;
    Ok((StatusCode::ACCEPTED, Json(created)))
}

#[api_handler(
    get,
    path = "/api/v1/legal-entities/{legal_entity_id}/kvk-verification",
    params(("legal_entity_id" = String, Path, description = "Legal entity ID")),
    responses(
        (status = OK, description = "Latest verification; each fetch advances the stub one step", body = KvkVerification),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = VERIFICATION_TAG,
)]
async fn latest_verification(
    _caller: Caller,
    State(state): State<SandboxState>,
    Path(legal_entity_id): Path<String>,
) -> ApiResult<Json<KvkVerification>> {
    Ok(Json(state.write().kvk_verification(&legal_entity_id)?))
}

#[api_handler(
    get,
    path = "/api/v1/kvk-verification/flagged",
    responses((status = OK, body = Vec<KvkVerification>)),
    tag = VERIFICATION_TAG,
)]
async fn flagged_verifications(_caller: Caller, State(state): State<SandboxState>) -> Json<Vec<KvkVerification>> {
    Json(state.read().flagged())
}

#[api_handler(
    post,
    path = "/api/v1/kvk-verification/{verification_id}/review",
    params(("verification_id" = String, Path, description = "Verification ID")),
    request_body = ReviewRequest,
    responses(
        (status = OK, body = KvkVerification),
        (status = BAD_REQUEST, description = "Rejection without notes", body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, description = "Not awaiting review", body = ErrorBody),
    ),
    tag = VERIFICATION_TAG,
)]
async fn review_verification(
    caller: Caller,
    State(state): State<SandboxState>,
    Path(verification_id): Path<String>,
    Payload(input): Payload<ReviewRequest>,
) -> ApiResult<Json<KvkVerification>> {
    Ok(Json(state.write().review(caller.writer()?, &verification_id, input)?))
}
