use axum::extract::{Query, State};
use axum::{routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::validation::{require_param, ValidatedJson};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::answer_key::{AnswerKeyCreate, AnswerKeyQuery, AnswerKeyResponse};
use crate::schemas::CreatedResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", post(create_answer_key).get(get_answer_key))
}

async fn create_answer_key(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AnswerKeyCreate>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let record = payload.into_record();
    let id = repositories::answer_keys::create(state.store(), &record)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save answer key"))?;

    tracing::info!(
        answer_key_id = %id,
        exam_name = %record.exam_name,
        total_questions = record.total_questions,
        "Answer key saved"
    );

    Ok(Json(CreatedResponse::new(id)))
}

async fn get_answer_key(
    Query(query): Query<AnswerKeyQuery>,
    State(state): State<AppState>,
) -> Result<Json<AnswerKeyResponse>, ApiError> {
    let exam_name = require_param(query.exam_name, "examName")?;

    let stored = repositories::answer_keys::find_active_by_exam_name(state.store(), &exam_name)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch answer key"))?
        .ok_or_else(|| ApiError::NotFound("Answer key not found".to_string()))?;

    Ok(Json(AnswerKeyResponse::from_stored(stored)))
}
