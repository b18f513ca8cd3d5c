use axum::extract::{Query, State};
use axum::{routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::validation::{require_param, ValidatedJson};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::candidate::{CandidateCreate, CandidateQuery, CandidateResponse};
use crate::schemas::CreatedResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", post(create_candidate).get(get_candidate))
}

async fn create_candidate(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CandidateCreate>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let record = payload.into_record();
    let id = repositories::candidates::create(state.store(), &record)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to register candidate"))?;

    tracing::info!(
        candidate_id = %id,
        registration_number = %record.registration_number,
        exam_name = ?record.exam_name,
        "Candidate registered"
    );

    Ok(Json(CreatedResponse::new(id)))
}

async fn get_candidate(
    Query(query): Query<CandidateQuery>,
    State(state): State<AppState>,
) -> Result<Json<CandidateResponse>, ApiError> {
    let lookup = match query.id.filter(|id| !id.trim().is_empty()) {
        Some(id) => repositories::candidates::find_by_id(state.store(), &id).await,
        None => {
            let registration_number =
                require_param(query.registration_number, "id or registrationNumber")?;
            repositories::candidates::find_by_registration_number(
                state.store(),
                &registration_number,
            )
            .await
        }
    };

    let candidate = lookup
        .map_err(|e| ApiError::internal(e, "Failed to fetch candidate"))?
        .ok_or_else(|| ApiError::NotFound("Candidate not found".to_string()))?;

    Ok(Json(CandidateResponse::from_stored(candidate)))
}
