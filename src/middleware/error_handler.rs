use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    Error, HttpRequest,
};

use crate::core::AppError;

// Extractor failures would otherwise answer in plain text; route them through
// `AppError` so every client-facing error shares one JSON shape.

/// `JsonConfig::error_handler` hook
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    log_error(req, &err);
    AppError::validation(format!("Invalid JSON body: {}", err)).into()
}

/// `QueryConfig::error_handler` hook
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    log_error(req, &err);
    AppError::validation(format!("Invalid query parameters: {}", err)).into()
}

/// `PathConfig::error_handler` hook
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    log_error(req, &err);
    AppError::validation(format!("Invalid path parameter: {}", err)).into()
}

pub fn log_error(req: &HttpRequest, err: &dyn std::fmt::Display) {
    tracing::debug!(
        method = %req.method(),
        path = %req.path(),
        error = %err,
        "Rejected malformed request"
    );
}
