// src/application/commands/upload_commands.rs
//
// Upload Command Handlers
//
// RULES:
// - Accept DTOs
// - Call services
// - Return DTOs
// - Never contain business logic

use uuid::Uuid;

use crate::application::dto::{BatchReportDto, UploadFilesDto};
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;
use crate::services::UploadBatchRequest;

/// Run one upload batch through the resolution workflow and refresh the
/// library view when the batch is still live.
pub async fn upload_files(
    state: &AppState,
    dto: UploadFilesDto,
) -> Result<BatchReportDto, ErrorResponse> {
    let category_ids = dto
        .category_ids
        .iter()
        .map(|id| {
            Uuid::parse_str(id)
                .map_err(|e| ErrorResponse::validation(format!("Invalid UUID '{}': {}", id, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let report = state
        .resolution_service
        .submit_batch(UploadBatchRequest {
            file_names: dto.file_names,
            category_ids,
        })
        .await
        .map_err(ErrorResponse::from)?;

    if !report.stale {
        state.library_service.reload().map_err(ErrorResponse::from)?;
    }

    Ok(report.into())
}

/// Drop interest in any in-flight batch (the upload view going away).
pub fn cancel_uploads(state: &AppState) {
    state.resolution_service.invalidate_batches();
}
