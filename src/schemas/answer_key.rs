use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_offset;
use crate::db::models::{AnswerKey, Stored};
use crate::db::types::AnswerKeyStatus;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerKeyCreate {
    #[validate(length(min = 1, message = "examName must not be empty"))]
    pub(crate) exam_name: String,
    #[serde(default)]
    pub(crate) total_questions: Option<u32>,
    #[serde(default)]
    pub(crate) answer_key: Option<BTreeMap<String, Option<String>>>,
    #[serde(default)]
    pub(crate) answer_string: Option<String>,
}

impl AnswerKeyCreate {
    pub(crate) fn into_record(self) -> AnswerKey {
        AnswerKey {
            exam_name: self.exam_name,
            total_questions: self.total_questions,
            answer_key: self.answer_key,
            answer_string: self.answer_string,
            status: AnswerKeyStatus::Active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerKeyQuery {
    #[serde(default)]
    pub(crate) exam_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerKeyResponse {
    pub(crate) id: String,
    pub(crate) exam_name: String,
    pub(crate) total_questions: Option<u32>,
    pub(crate) answer_key: Option<BTreeMap<String, Option<String>>>,
    pub(crate) answer_string: Option<String>,
    pub(crate) created_at: Option<String>,
    pub(crate) status: AnswerKeyStatus,
}

impl AnswerKeyResponse {
    pub(crate) fn from_stored(stored: Stored<AnswerKey>) -> Self {
        let Stored { id, created_at, record } = stored;
        Self {
            id,
            exam_name: record.exam_name,
            total_questions: record.total_questions,
            answer_key: record.answer_key,
            answer_string: record.answer_string,
            created_at: created_at.map(format_offset),
            status: record.status,
        }
    }
}
