use axum::extract::{Query, State};
use axum::{routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::validation::{require_param, ValidatedJson};
use crate::core::state::AppState;
use crate::db::types::StoreDate;
use crate::repositories;
use crate::schemas::exam_result::{ExamResultCreate, ExamResultQuery, ExamResultResponse};
use crate::schemas::CreatedResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", post(create_exam_result).get(get_exam_result))
}

async fn create_exam_result(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ExamResultCreate>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let record = payload.into_record(StoreDate::now());
    let id = repositories::exam_results::create(state.store(), &record)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save exam result"))?;

    tracing::info!(
        exam_result_id = %id,
        registration_number = %record.registration_number,
        answered_questions = record.answered_questions,
        "Exam result secured"
    );

    Ok(Json(CreatedResponse::new(id)))
}

async fn get_exam_result(
    Query(query): Query<ExamResultQuery>,
    State(state): State<AppState>,
) -> Result<Json<ExamResultResponse>, ApiError> {
    let registration_number = require_param(query.registration_number, "registrationNumber")?;

    let stored =
        repositories::exam_results::find_by_registration_number(state.store(), &registration_number)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch exam result"))?
            .ok_or_else(|| ApiError::NotFound("Exam result not found".to_string()))?;

    Ok(Json(ExamResultResponse::from_stored(stored)))
}
