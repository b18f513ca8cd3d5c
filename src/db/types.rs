use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{format_description::well_known::Rfc3339, OffsetDateTime, UtcOffset};

use crate::core::time::{format_offset, truncate_to_millis};

/// Timestamp in the hosted store's date encoding: `{"__type": "Date", "iso": "..."}`.
/// Plain RFC 3339 strings are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StoreDate(pub(crate) OffsetDateTime);

#[derive(Serialize)]
struct TaggedDateOut<'a> {
    #[serde(rename = "__type")]
    kind: &'a str,
    iso: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateIn {
    Tagged { iso: String },
    Plain(String),
}

impl StoreDate {
    pub(crate) fn now() -> Self {
        Self(truncate_to_millis(crate::core::time::now_utc()))
    }

    pub(crate) fn to_rfc3339(self) -> String {
        format_offset(self.0)
    }
}

impl Serialize for StoreDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let utc = truncate_to_millis(self.0.to_offset(UtcOffset::UTC));
        TaggedDateOut { kind: "Date", iso: format_offset(utc) }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StoreDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match DateIn::deserialize(deserializer)? {
            DateIn::Tagged { iso } => iso,
            DateIn::Plain(value) => value,
        };
        OffsetDateTime::parse(&raw, &Rfc3339)
            .map(Self)
            .map_err(|err| serde::de::Error::custom(format!("invalid date '{raw}': {err}")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AnswerKeyStatus {
    #[default]
    Active,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CandidateStatus {
    #[default]
    Registered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ExamResultStatus {
    #[default]
    Secured,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FinalResultStatus {
    #[default]
    Published,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn store_date_serializes_as_tagged_utc_millis() {
        let value = OffsetDateTime::parse("2025-05-06T10:00:00.987654+02:00", &Rfc3339).unwrap();
        let encoded = serde_json::to_value(StoreDate(value)).unwrap();
        assert_eq!(encoded, json!({"__type": "Date", "iso": "2025-05-06T08:00:00.987Z"}));
    }

    #[test]
    fn store_date_reads_tagged_and_plain_forms() {
        let tagged: StoreDate =
            serde_json::from_value(json!({"__type": "Date", "iso": "2025-05-06T08:00:00.000Z"}))
                .unwrap();
        let plain: StoreDate = serde_json::from_value(json!("2025-05-06T08:00:00Z")).unwrap();
        assert_eq!(tagged, plain);
    }

    #[test]
    fn store_date_rejects_non_dates() {
        assert!(serde_json::from_value::<StoreDate>(json!("yesterday")).is_err());
        assert!(serde_json::from_value::<StoreDate>(json!(42)).is_err());
    }

    #[test]
    fn statuses_use_lowercase_names() {
        assert_eq!(serde_json::to_value(AnswerKeyStatus::Active).unwrap(), json!("active"));
        assert_eq!(serde_json::to_value(CandidateStatus::Registered).unwrap(), json!("registered"));
        assert_eq!(serde_json::to_value(ExamResultStatus::Secured).unwrap(), json!("secured"));
        assert_eq!(serde_json::to_value(FinalResultStatus::Published).unwrap(), json!("published"));
    }
}
