use crate::dtos::InquiryCreatedResponse;
use crate::models::Inquiry;
use crate::services::record_inquiry;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;

/// Accept a contact inquiry.
///
/// POST /api/inquiries
pub async fn create_inquiry(
    State(state): State<AppState>,
    ValidatedJson(inquiry): ValidatedJson<Inquiry>,
) -> Result<(StatusCode, Json<InquiryCreatedResponse>), AppError> {
    let repository = state.repository()?;

    let saved = repository.submit_inquiry(inquiry).await.map_err(|e| {
        record_inquiry("failed");
        e
    })?;

    tracing::info!(inquiry_id = %saved.id, subject = %saved.record.subject, "Inquiry received");
    record_inquiry("accepted");

    Ok((
        StatusCode::CREATED,
        Json(InquiryCreatedResponse {
            ok: true,
            inquiry: saved,
        }),
    ))
}
