use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};

pub(crate) fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub(crate) fn format_offset(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}

/// Millisecond precision, which is what the hosted store keeps for dates.
pub(crate) fn truncate_to_millis(value: OffsetDateTime) -> OffsetDateTime {
    let millis = value.millisecond();
    value.replace_millisecond(millis).unwrap_or(value)
}

/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date (taken as UTC midnight).
pub(crate) fn parse_date_or_datetime(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value.to_offset(UtcOffset::UTC));
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}
