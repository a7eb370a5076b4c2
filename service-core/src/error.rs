use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::{borrow::Cow, collections::BTreeMap};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// Store error messages are cut to this many characters before they reach a client.
pub const MAX_STORE_ERROR_LEN: usize = 120;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    /// Violations keyed by request field, for input that never reached `Validate`
    /// intact (values of the wrong type mixed with constraint failures).
    #[error("Validation error: {0:?}")]
    InvalidFields(BTreeMap<String, Vec<String>>),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Storage unavailable: no database connection is configured")]
    StorageUnavailable,

    #[error("Store operation failed: {0}")]
    StoreOperationError(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    /// Wraps a store failure, truncating its message to [`MAX_STORE_ERROR_LEN`] characters.
    pub fn store(err: impl std::fmt::Display) -> Self {
        AppError::StoreOperationError(truncate(&err.to_string(), MAX_STORE_ERROR_LEN))
    }

    /// Single-field validation failure for input the `Validate` derive cannot
    /// see, such as a query string that failed to decode or an out-of-range limit.
    pub fn invalid_field(field: &'static str, code: &'static str, message: String) -> Self {
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Owned(message));

        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        AppError::ValidationError(errors)
    }
}

fn truncate(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}

/// Collects every violated constraint, keyed by field name.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

fn describe_fields(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::store(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            fields: Option<BTreeMap<String, Vec<String>>>,
        }

        let (status, error_message, details, fields) = match self {
            AppError::ValidationError(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error".to_string(),
                Some(err.to_string()),
                Some(field_messages(&err)),
            ),
            AppError::InvalidFields(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error".to_string(),
                Some(describe_fields(&fields)),
                Some(fields),
            ),
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string(), None, None),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None, None),
            AppError::StorageUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database not initialized".to_string(),
                Some(
                    "No database connection is available; check DATABASE_URL and DATABASE_NAME"
                        .to_string(),
                ),
                None,
            ),
            AppError::StoreOperationError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
                Some(msg),
                None,
            ),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(format!("{:#}", err)),
                None,
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
                None,
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
                fields,
            }),
        )
            .into_response()
    }
}
