use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::core::time::parse_date_or_datetime;

pub(crate) mod answer_key;
pub(crate) mod candidate;
pub(crate) mod exam_result;
pub(crate) mod final_result;
pub(crate) mod omr;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatedResponse {
    pub(crate) success: bool,
    pub(crate) id: String,
}

impl CreatedResponse {
    pub(crate) fn new(id: String) -> Self {
        Self { success: true, id }
    }
}

// Registration forms post numeric inputs either as numbers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::String(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(StringOrNumber::into_string))
}

pub(crate) fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Number(value)) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("number out of range: {value}"))),
        Some(StringOrNumber::String(value)) if value.trim().is_empty() => Ok(None),
        Some(StringOrNumber::String(value)) => value
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got '{value}'"))),
    }
}

/// Blank or missing dates are `None`; anything else must parse.
pub(crate) fn opt_date_or_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_date_or_datetime(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct RegistrationFields {
        #[serde(default, deserialize_with = "lenient_opt_string")]
        phone: Option<String>,
        #[serde(default, deserialize_with = "lenient_opt_string")]
        passing_year: Option<String>,
        #[serde(default, deserialize_with = "lenient_opt_f64")]
        percentage: Option<f64>,
        #[serde(default, deserialize_with = "opt_date_or_datetime")]
        date_of_birth: Option<OffsetDateTime>,
    }

    #[test]
    fn accepts_numbers_and_strings() {
        let fields: RegistrationFields = serde_json::from_value(json!({
            "phone": 9876543210u64,
            "passing_year": "2022",
            "percentage": "87.5",
            "date_of_birth": "2001-04-12"
        }))
        .unwrap();
        assert_eq!(fields.phone.as_deref(), Some("9876543210"));
        assert_eq!(fields.passing_year.as_deref(), Some("2022"));
        assert_eq!(fields.percentage, Some(87.5));
        assert!(fields.date_of_birth.is_some());
    }

    #[test]
    fn missing_and_blank_optionals_are_none() {
        let fields: RegistrationFields =
            serde_json::from_value(json!({"percentage": " ", "date_of_birth": ""})).unwrap();
        assert_eq!(fields.phone, None);
        assert_eq!(fields.passing_year, None);
        assert_eq!(fields.percentage, None);
        assert_eq!(fields.date_of_birth, None);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(
            serde_json::from_value::<RegistrationFields>(json!({"percentage": "high"})).is_err()
        );
        assert!(
            serde_json::from_value::<RegistrationFields>(json!({"date_of_birth": "someday"}))
                .is_err()
        );
    }
}
