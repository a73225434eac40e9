use crate::error::{ApiError, ApiResult};
use crate::extract::Caller;
use crate::state::SandboxState;
use axum::Json;
use axum::extract::{Query, State};
use axum::extract::rejection::QueryRejection;
use ctn::domain::constants::AUDIT_TAG;
use ctn::domain::models::{AuditAction, AuditPage, AuditQuery, ErrorBody};
use ctn_derive::api_handler;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub(crate) fn router() -> OpenApiRouter<SandboxState> {
    OpenApiRouter::new().routes(routes!(list_audit_logs))
}

#[api_handler(
    get,
    path = "/api/v1/audit-logs",
    params(
        ("action" = Option<AuditAction>, Query, description = "Only this action"),
        ("resourceType" = Option<String>, Query, description = "Only this resource type"),
        ("actor" = Option<String>, Query, description = "Actor contains this text"),
        ("page" = Option<u32>, Query, description = "1-based page, default 1"),
        ("pageSize" = Option<u32>, Query, description = "Rows per page, default 10"),
    ),
    responses((status = OK, body = AuditPage), (status = BAD_REQUEST, body = ErrorBody)),
    tag = AUDIT_TAG,
)]
async fn list_audit_logs(
    _caller: Caller,
    State(state): State<SandboxState>,
    query: Result<Query<AuditQuery>, QueryRejection>,
) -> ApiResult<Json<AuditPage>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(Json(state.read().audit_logs(&query)?))
}
