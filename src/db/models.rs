use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::types::{
    AnswerKeyStatus, CandidateStatus, ExamResultStatus, FinalResultStatus, StoreDate,
};

/// A typed record persisted as one document of `CLASS`.
pub(crate) trait Record: Serialize + DeserializeOwned + Send + Sync {
    const CLASS: &'static str;
}

/// A record as read back from the store, with the store-assigned identity.
#[derive(Debug, Clone)]
pub(crate) struct Stored<T> {
    pub(crate) id: String,
    pub(crate) created_at: Option<OffsetDateTime>,
    pub(crate) record: T,
}

// Documents written by earlier clients may lack any field; only the lookup key and
// status are assumed, and both fall back to defaults when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerKey {
    #[serde(default)]
    pub(crate) exam_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) total_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) answer_key: Option<BTreeMap<String, Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) answer_string: Option<String>,
    #[serde(default)]
    pub(crate) status: AnswerKeyStatus,
}

impl Record for AnswerKey {
    const CLASS: &'static str = "AnswerKey";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) mother_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) date_of_birth: Option<StoreDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) exam_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) exam_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) passing_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) percentage: Option<f64>,
    #[serde(default, rename = "preferredCenter1", skip_serializing_if = "Option::is_none")]
    pub(crate) preferred_center_1: Option<String>,
    #[serde(default, rename = "preferredCenter2", skip_serializing_if = "Option::is_none")]
    pub(crate) preferred_center_2: Option<String>,
    #[serde(default, rename = "preferredCenter3", skip_serializing_if = "Option::is_none")]
    pub(crate) preferred_center_3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) aadhar_number: Option<String>,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub(crate) photo_url: Option<String>,
    #[serde(default)]
    pub(crate) registration_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) registration_hash: Option<String>,
    #[serde(default)]
    pub(crate) status: CandidateStatus,
    #[serde(default)]
    pub(crate) admit_card_generated: bool,
}

impl Record for Candidate {
    const CLASS: &'static str = "Candidate";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExamResult {
    #[serde(default)]
    pub(crate) registration_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) candidate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) candidate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) answer_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) answer_string_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) omr_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) omr_roll_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) total_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) answered_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) processed_at: Option<StoreDate>,
    #[serde(default)]
    pub(crate) status: ExamResultStatus,
}

impl Record for ExamResult {
    const CLASS: &'static str = "ExamResult";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FinalResult {
    #[serde(default)]
    pub(crate) registration_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) candidate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) candidate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) exam_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) total_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) correct_answers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) wrong_answers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) unattempted: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) generated_at: Option<StoreDate>,
    #[serde(default)]
    pub(crate) status: FinalResultStatus,
}

impl Record for FinalResult {
    const CLASS: &'static str = "FinalResult";
}
