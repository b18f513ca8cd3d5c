use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::{ExamResult, Stored};
use crate::db::types::{ExamResultStatus, StoreDate};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExamResultCreate {
    #[validate(length(min = 1, message = "registrationNumber must not be empty"))]
    pub(crate) registration_number: String,
    #[serde(default)]
    pub(crate) candidate_id: Option<String>,
    #[serde(default)]
    pub(crate) candidate_name: Option<String>,
    #[serde(default)]
    pub(crate) answer_string: Option<String>,
    #[serde(default)]
    pub(crate) answer_string_hash: Option<String>,
    #[serde(default)]
    pub(crate) omr_name: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_opt_string")]
    pub(crate) omr_roll_number: Option<String>,
    #[serde(default)]
    pub(crate) version: Option<String>,
    #[serde(default)]
    pub(crate) total_questions: Option<u32>,
    #[serde(default)]
    pub(crate) answered_questions: Option<u32>,
}

impl ExamResultCreate {
    pub(crate) fn into_record(self, processed_at: StoreDate) -> ExamResult {
        ExamResult {
            registration_number: self.registration_number,
            candidate_id: self.candidate_id,
            candidate_name: self.candidate_name,
            answer_string: self.answer_string,
            answer_string_hash: self.answer_string_hash,
            omr_name: self.omr_name,
            omr_roll_number: self.omr_roll_number,
            version: self.version,
            total_questions: self.total_questions,
            answered_questions: self.answered_questions,
            processed_at: Some(processed_at),
            status: ExamResultStatus::Secured,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExamResultQuery {
    #[serde(default)]
    pub(crate) registration_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExamResultResponse {
    pub(crate) id: String,
    pub(crate) registration_number: String,
    pub(crate) candidate_id: Option<String>,
    pub(crate) candidate_name: Option<String>,
    pub(crate) answer_string: Option<String>,
    pub(crate) answer_string_hash: Option<String>,
    pub(crate) omr_name: Option<String>,
    pub(crate) omr_roll_number: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) total_questions: Option<u32>,
    pub(crate) answered_questions: Option<u32>,
    pub(crate) processed_at: Option<String>,
    pub(crate) status: ExamResultStatus,
}

impl ExamResultResponse {
    pub(crate) fn from_stored(stored: Stored<ExamResult>) -> Self {
        let Stored { id, record, .. } = stored;
        Self {
            id,
            registration_number: record.registration_number,
            candidate_id: record.candidate_id,
            candidate_name: record.candidate_name,
            answer_string: record.answer_string,
            answer_string_hash: record.answer_string_hash,
            omr_name: record.omr_name,
            omr_roll_number: record.omr_roll_number,
            version: record.version,
            total_questions: record.total_questions,
            answered_questions: record.answered_questions,
            processed_at: record.processed_at.map(StoreDate::to_rfc3339),
            status: record.status,
        }
    }
}
