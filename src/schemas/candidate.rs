use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use crate::core::time::format_offset;
use crate::db::models::{Candidate, Stored};
use crate::db::types::{CandidateStatus, StoreDate};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CandidateCreate {
    #[serde(default)]
    pub(crate) full_name: Option<String>,
    #[serde(default)]
    pub(crate) father_name: Option<String>,
    #[serde(default)]
    pub(crate) mother_name: Option<String>,
    #[serde(default, deserialize_with = "super::opt_date_or_datetime")]
    pub(crate) date_of_birth: Option<OffsetDateTime>,
    #[serde(default)]
    pub(crate) gender: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_opt_string")]
    pub(crate) phone: Option<String>,
    #[serde(default)]
    pub(crate) address: Option<String>,
    #[serde(default)]
    pub(crate) city: Option<String>,
    #[serde(default)]
    pub(crate) state: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_opt_string")]
    pub(crate) pincode: Option<String>,
    #[serde(default)]
    pub(crate) exam_name: Option<String>,
    #[serde(default)]
    pub(crate) exam_category: Option<String>,
    #[serde(default)]
    pub(crate) qualification: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_opt_string")]
    pub(crate) passing_year: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_opt_f64")]
    pub(crate) percentage: Option<f64>,
    #[serde(default, rename = "preferredCenter1")]
    pub(crate) preferred_center_1: Option<String>,
    #[serde(default, rename = "preferredCenter2")]
    pub(crate) preferred_center_2: Option<String>,
    #[serde(default, rename = "preferredCenter3")]
    pub(crate) preferred_center_3: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_opt_string")]
    pub(crate) aadhar_number: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub(crate) photo_url: Option<String>,
    #[validate(length(min = 1, message = "registrationNumber must not be empty"))]
    pub(crate) registration_number: String,
    #[serde(default)]
    pub(crate) registration_hash: Option<String>,
}

impl CandidateCreate {
    pub(crate) fn into_record(self) -> Candidate {
        Candidate {
            full_name: self.full_name,
            father_name: self.father_name,
            mother_name: self.mother_name,
            date_of_birth: self.date_of_birth.map(StoreDate),
            gender: self.gender,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            exam_name: self.exam_name,
            exam_category: self.exam_category,
            qualification: self.qualification,
            passing_year: self.passing_year,
            percentage: self.percentage,
            preferred_center_1: self.preferred_center_1,
            preferred_center_2: self.preferred_center_2,
            preferred_center_3: self.preferred_center_3,
            aadhar_number: self.aadhar_number,
            photo_url: self.photo_url,
            registration_number: self.registration_number,
            registration_hash: self.registration_hash,
            status: CandidateStatus::Registered,
            admit_card_generated: false,
        }
    }
}

/// `id` wins when both keys are given.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CandidateQuery {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) registration_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CandidateResponse {
    pub(crate) id: String,
    pub(crate) full_name: Option<String>,
    pub(crate) father_name: Option<String>,
    pub(crate) mother_name: Option<String>,
    pub(crate) date_of_birth: Option<String>,
    pub(crate) gender: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) address: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) pincode: Option<String>,
    pub(crate) exam_name: Option<String>,
    pub(crate) exam_category: Option<String>,
    pub(crate) qualification: Option<String>,
    pub(crate) passing_year: Option<String>,
    pub(crate) percentage: Option<f64>,
    #[serde(rename = "preferredCenter1")]
    pub(crate) preferred_center_1: Option<String>,
    #[serde(rename = "preferredCenter2")]
    pub(crate) preferred_center_2: Option<String>,
    #[serde(rename = "preferredCenter3")]
    pub(crate) preferred_center_3: Option<String>,
    pub(crate) aadhar_number: Option<String>,
    pub(crate) registration_number: String,
    pub(crate) registration_hash: Option<String>,
    #[serde(rename = "photoURL")]
    pub(crate) photo_url: Option<String>,
    pub(crate) status: CandidateStatus,
    pub(crate) admit_card_generated: bool,
    pub(crate) created_at: Option<String>,
}

impl CandidateResponse {
    pub(crate) fn from_stored(stored: Stored<Candidate>) -> Self {
        let Stored { id, created_at, record } = stored;
        Self {
            id,
            full_name: record.full_name,
            father_name: record.father_name,
            mother_name: record.mother_name,
            date_of_birth: record.date_of_birth.map(StoreDate::to_rfc3339),
            gender: record.gender,
            email: record.email,
            phone: record.phone,
            address: record.address,
            city: record.city,
            state: record.state,
            pincode: record.pincode,
            exam_name: record.exam_name,
            exam_category: record.exam_category,
            qualification: record.qualification,
            passing_year: record.passing_year,
            percentage: record.percentage,
            preferred_center_1: record.preferred_center_1,
            preferred_center_2: record.preferred_center_2,
            preferred_center_3: record.preferred_center_3,
            aadhar_number: record.aadhar_number,
            registration_number: record.registration_number,
            registration_hash: record.registration_hash,
            photo_url: record.photo_url,
            status: record.status,
            admit_card_generated: record.admit_card_generated,
            created_at: created_at.map(format_offset),
        }
    }
}
