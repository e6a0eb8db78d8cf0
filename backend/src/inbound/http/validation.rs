//! Shared request validation for inbound HTTP adapters.
//!
//! Extractor failures (malformed JSON, bad query strings) are rewritten into
//! the domain error envelope so every 400 has the same shape.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Validation error codes raised by the HTTP adapter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidBody,
    InvalidQuery,
    InvalidFlag,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidBody => "invalid_body",
            ErrorCode::InvalidQuery => "invalid_query",
            ErrorCode::InvalidFlag => "invalid_flag",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    Error::invalid_request(format!("invalid request body: {err}"))
        .with_details(json!({ "code": ErrorCode::InvalidBody.as_str() }))
        .into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected query string");
    Error::invalid_request(format!("invalid query string: {err}"))
        .with_details(json!({ "code": ErrorCode::InvalidQuery.as_str() }))
        .into()
}

/// JSON extractor configuration reporting failures as domain errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Query extractor configuration reporting failures as domain errors.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

/// Meal flag as sent by clients: a boolean or the integers `0` and `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum FlagInput {
    Bool(bool),
    Number(i64),
}

impl FlagInput {
    pub(crate) fn parse(self, field: FieldName) -> Result<bool, Error> {
        match self {
            Self::Bool(value) => Ok(value),
            Self::Number(0) => Ok(false),
            Self::Number(1) => Ok(true),
            Self::Number(other) => Err(Error::invalid_request(format!(
                "{} must be a boolean, 0 or 1",
                field.as_str()
            ))
            .with_details(json!({
                "field": field.as_str(),
                "value": other,
                "code": ErrorCode::InvalidFlag.as_str(),
            }))),
        }
    }
}

pub(crate) fn parse_optional_flag(
    value: Option<FlagInput>,
    field: FieldName,
) -> Result<Option<bool>, Error> {
    value.map(|flag| flag.parse(field)).transpose()
}
