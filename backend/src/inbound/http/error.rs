//! Rendering of domain errors as HTTP responses.
//!
//! Client errors are returned verbatim inside the JSON envelope. Internal
//! errors are logged with their full message and replaced by a generic one,
//! keeping only the trace id so operators can correlate the two.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

const INTERNAL_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        if self.code() != ErrorCode::InternalError {
            debug!(status = status.as_u16(), reason = self.message(), "request rejected");
            return builder.json(self);
        }

        error!(trace_id = ?self.trace_id(), reason = self.message(), "request failed");
        let redacted = match self.trace_id() {
            Some(id) => Error::internal(INTERNAL_MESSAGE).with_trace_id(id.to_owned()),
            None => Error::internal(INTERNAL_MESSAGE),
        };
        builder.json(redacted)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(INTERNAL_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
