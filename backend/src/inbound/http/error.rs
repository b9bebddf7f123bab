//! Rendering of domain errors as HTTP responses.
//!
//! Every failure leaves the API as the JSON error envelope with the request's
//! `trace-id` header. That includes extractor rejections: malformed JSON
//! bodies, unparsable path segments and bad query strings are reported as
//! `invalid_request` through the configs returned by [`json_config`],
//! [`path_config`] and [`query_config`].

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for device, deadline and import handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message sent in place of any internal error.
pub const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing copy of `error`; internal failures lose message and details.
fn public_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(
        trace_id = error.trace_id(),
        message = error.message(),
        "internal error redacted from response"
    );
    let redacted = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(public_view(self))
    }
}

/// Rejections with a 4xx status become `invalid_request` carrying the original
/// status in `details`; anything else is an internal error.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        let status = err.as_response_error().status_code();
        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %err, "request rejected");
            Self::invalid_request(err.to_string()).with_details(json!({ "status": status.as_u16() }))
        } else {
            error!(status = status.as_u16(), error = %err, "request failed outside a handler");
            Self::internal(REDACTED_MESSAGE)
        }
    }
}

fn rejection(err: actix_web::Error) -> actix_web::Error {
    Error::from(err).into()
}

/// JSON body extractor settings reporting rejections in the error envelope.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| rejection(err.into()))
}

/// Path extractor settings; a non-numeric device id is an `invalid_request`.
#[must_use]
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| rejection(err.into()))
}

#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| rejection(err.into()))
}
