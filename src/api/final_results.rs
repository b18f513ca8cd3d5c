use axum::extract::State;
use axum::{routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::validation::ValidatedJson;
use crate::core::state::AppState;
use crate::db::types::StoreDate;
use crate::repositories;
use crate::schemas::final_result::FinalResultCreate;
use crate::schemas::CreatedResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", post(create_final_result))
}

async fn create_final_result(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<FinalResultCreate>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let record = payload.into_record(StoreDate::now());
    let id = repositories::final_results::create(state.store(), &record)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to publish final result"))?;

    tracing::info!(
        final_result_id = %id,
        registration_number = %record.registration_number,
        score = record.score,
        "Final result published"
    );

    Ok(Json(CreatedResponse::new(id)))
}

#[cfg(test)]
mod tests;
