//! Waitlist registration endpoint.

use axum::{extract::State, http::StatusCode, Json};

use crate::lead::LeadRecord;
use crate::rest::state::ApiState;
use crate::services::SubmissionResult;

/// Register a lead on the waitlist
///
/// Every outcome carries a `SubmissionResult` body; failures set `error`.
#[utoipa::path(
    post,
    path = "/api/v1/waitlist",
    tag = "Waitlist",
    request_body = LeadRecord,
    responses(
        (status = 201, description = "Registered", body = SubmissionResult),
        (status = 400, description = "Invalid form data", body = SubmissionResult),
        (status = 409, description = "Email already registered", body = SubmissionResult)
    )
)]
pub async fn register(
    State(state): State<ApiState>,
    Json(record): Json<LeadRecord>,
) -> (StatusCode, Json<SubmissionResult>) {
    let result = state.waitlist.register_lead(&record).await;

    let status = if result.success {
        StatusCode::CREATED
    } else if result.is_duplicate_email() {
        StatusCode::CONFLICT
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(result))
}
