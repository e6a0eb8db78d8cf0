//! Input parsing shared by the domain services.
//!
//! Each helper turns a raw caller value into a domain type and reports
//! failures as `invalid_request` with `{field, value, code}` details.

use mockable::Clock;
use serde_json::json;

use crate::domain::{
    AttendanceDate, AttendanceValidationError, Error, UserValidationError, Username, YearMonth,
};

fn invalid_field(field: &str, value: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": code,
    }))
}

fn username_code(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::EmptyUsername => "empty_username",
        UserValidationError::UsernameTooLong { .. } => "username_too_long",
        _ => "invalid_username",
    }
}

pub(crate) fn parse_username(raw: &str) -> Result<Username, Error> {
    Username::new(raw)
        .map_err(|err| invalid_field("username", raw, username_code(&err), err.to_string()))
}

pub(crate) fn parse_date(field: &str, raw: &str) -> Result<AttendanceDate, Error> {
    AttendanceDate::parse(raw)
        .map_err(|err| invalid_field(field, raw, "invalid_date", err.to_string()))
}

pub(crate) fn parse_optional_date(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<AttendanceDate>, Error> {
    raw.map(|value| parse_date(field, value)).transpose()
}

pub(crate) fn parse_month(raw: &str) -> Result<YearMonth, Error> {
    YearMonth::parse(raw)
        .map_err(|err| invalid_field("month", raw, "invalid_month", err.to_string()))
}

pub(crate) fn attendance_error(field: &str, raw: &str, err: AttendanceValidationError) -> Error {
    let code = match &err {
        AttendanceValidationError::InvalidDate { .. } => "invalid_date",
        AttendanceValidationError::InvalidMonth { .. } => "invalid_month",
        AttendanceValidationError::InvalidRange { .. } => "invalid_range",
        AttendanceValidationError::DayCountOutOfRange { .. } => "day_count_out_of_range",
        AttendanceValidationError::LimitOutOfRange { .. } => "limit_out_of_range",
        AttendanceValidationError::InvertedBounds { .. } => "inverted_bounds",
        AttendanceValidationError::UnknownWriteMode => "invalid_mode",
    };
    invalid_field(field, raw, code, err.to_string())
}

/// Today's date according to `clock`, in UTC.
pub(crate) fn today(clock: &dyn Clock) -> AttendanceDate {
    AttendanceDate::from_naive(clock.utc().date_naive())
}
