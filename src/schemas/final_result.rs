use serde::Deserialize;
use validator::Validate;

use crate::db::models::FinalResult;
use crate::db::types::{FinalResultStatus, StoreDate};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FinalResultCreate {
    #[validate(length(min = 1, message = "registrationNumber must not be empty"))]
    pub(crate) registration_number: String,
    #[serde(default)]
    pub(crate) candidate_id: Option<String>,
    #[serde(default)]
    pub(crate) candidate_name: Option<String>,
    #[serde(default)]
    pub(crate) exam_name: Option<String>,
    #[serde(default)]
    pub(crate) total_questions: Option<u32>,
    #[serde(default)]
    pub(crate) correct_answers: Option<u32>,
    #[serde(default)]
    pub(crate) wrong_answers: Option<u32>,
    #[serde(default)]
    pub(crate) unattempted: Option<u32>,
    #[serde(default)]
    pub(crate) score: Option<f64>,
    #[serde(default)]
    pub(crate) percentage: Option<f64>,
}

impl FinalResultCreate {
    pub(crate) fn into_record(self, generated_at: StoreDate) -> FinalResult {
        FinalResult {
            registration_number: self.registration_number,
            candidate_id: self.candidate_id,
            candidate_name: self.candidate_name,
            exam_name: self.exam_name,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            wrong_answers: self.wrong_answers,
            unattempted: self.unattempted,
            score: self.score,
            percentage: self.percentage,
            generated_at: Some(generated_at),
            status: FinalResultStatus::Published,
        }
    }
}
