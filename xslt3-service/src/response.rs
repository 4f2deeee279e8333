//! Maps transformation results onto HTTP responses

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::error;
use xslt_engine_traits::OutputMethod;

use crate::error::{Error, Result};
use crate::result::TransformOutcome;

/// Content type announced for a successful result
pub fn content_type(method: OutputMethod) -> &'static str {
    match method {
        OutputMethod::Xml => "application/xml",
        OutputMethod::Text => "application/text",
        OutputMethod::Html => "application/html",
        OutputMethod::Json => "application/json",
    }
}

/// 400 with a JSON array of messages
pub fn failure(messages: Vec<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(messages)).into_response()
}

impl IntoResponse for TransformOutcome {
    fn into_response(self) -> Response {
        match self {
            TransformOutcome::Success {
                body,
                output_method,
            } => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type(output_method))],
                body,
            )
                .into_response(),
            TransformOutcome::Failure { messages } => failure(messages),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!(error = %self, "unhandled transformation fault");
        failure(vec![self.to_string()])
    }
}

/// Final answer for one request, faults included
pub fn classify(result: Result<TransformOutcome>) -> Response {
    match result {
        Ok(outcome) => outcome.into_response(),
        Err(fault) => fault.into_response(),
    }
}
