//! Registration handlers

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{OperationMetadata, RegistrationId};

use crate::dto::registration::{
    CpfExistsResponse, RegistrationSummaryResponse, SubmissionResponse, SubmitRegistrationRequest,
};
use crate::{error::ApiError, AppState};

/// Builds port metadata from the propagated request id, when present
fn request_metadata(headers: &HeaderMap) -> Option<OperationMetadata> {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(OperationMetadata::with_correlation_id)
}

/// Submits a completed draft, creating the registration exactly once
///
/// 201 with the receipt on success; 422 with the field list for validation
/// failures, 409 for a duplicate CPF, 503 when storage is unreachable.
pub async fn submit_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SubmitRegistrationRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    request.validate()?;
    let draft = request.into_draft()?;
    let outcome = state
        .service
        .submit(&draft, request_metadata(&headers))
        .await?;

    Ok((StatusCode::CREATED, Json(outcome.receipt.into())))
}

/// Gets the projected summary of a stored registration
pub async fn get_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationSummaryResponse>, ApiError> {
    let summary = state
        .service
        .fetch_summary(RegistrationId::from_uuid(id), request_metadata(&headers))
        .await?;

    Ok(Json(summary.into()))
}

/// Whether a registration with this CPF already exists
///
/// The uniqueness fast path for the wizard UI. A storage failure is 503,
/// never a fabricated `false`.
pub async fn cpf_exists(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(cpf): Path<String>,
) -> Result<Json<CpfExistsResponse>, ApiError> {
    let exists = state
        .service
        .cpf_exists(&cpf, request_metadata(&headers))
        .await?;

    Ok(Json(CpfExistsResponse { exists }))
}
