//! Error taxonomy of the import service.
//!
//! Whole-call failures are split by collaborator: [`ImportFailure`] for faults
//! in the uploaded file or the caller's mapping, [`StoreError`] for the record
//! store, [`AuthError`] for the credential check. Per-row rejections are not
//! errors at all; they travel inside `ImportResult::errors`.
//!
//! Every type renders as the JSON body `{ "message": ..., "statusCode": ... }`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Faults that abort an import before or instead of producing an `ImportResult`.
#[derive(Error, Debug)]
pub enum ImportFailure {
    #[error("Unsupported file type '{0}'. Please upload CSV or Excel.")]
    UnsupportedFormat(String),

    #[error("No headers found in file.")]
    NoHeaders,

    #[error("Duplicate column '{0}' in file header.")]
    DuplicateHeader(String),

    #[error("An email column mapping is required.")]
    MissingEmailMapping,

    /// The file has a supported extension but its content could not be decoded.
    #[error("Could not read file: {0}")]
    MalformedFile(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures reported by the lead store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write collided with the unique email constraint. The whole batch is rolled back.
    #[error("Email already exists: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Credential check failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authorization token.")]
    MissingToken,

    #[error("Invalid or expired token.")]
    InvalidToken,

    #[error("JWT secret not configured.")]
    SecretNotConfigured,
}

fn error_body(status: StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "message": message,
        "statusCode": status.as_u16(),
    }))
}

impl ResponseError for ImportFailure {
    fn status_code(&self) -> StatusCode {
        match self {
            ImportFailure::Store(e) => e.status_code(),
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::SecretNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

/// Request-level faults raised by the HTTP layer itself (multipart parsing,
/// worker thread failures), as opposed to the import pipeline.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("File is required.")]
    MissingFile,

    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("Upload exceeds the limit of {0} bytes.")]
    PayloadTooLarge(usize),

    #[error("Malformed upload: {0}")]
    Multipart(String),

    #[error("Worker failed: {0}")]
    Worker(String),
}

impl ResponseError for RequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            RequestError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            RequestError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}
