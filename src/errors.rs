use std::fmt;

use actix_multipart::MultipartError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    InvalidInput(String),
    NotFound(String),
    Conflict(String),
    PayloadTooLarge(String),
    UploadFailure(String),
    PersistenceFailure(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::UploadFailure(msg) => write!(f, "Image upload failed: {}", msg),
            AppError::PersistenceFailure(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "error": "Validation failed",
                    "details": errors
                })
            }
            AppError::NotFound(msg) => {
                serde_json::json!({"error": self.to_string(), "message": msg})
            }
            _ => {
                serde_json::json!({"error": self.to_string()})
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UploadFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        // HashMap iteration order is arbitrary
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::PersistenceFailure(err.to_string())
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        AppError::UploadFailure(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        match err {
            MultipartError::ContentTypeMissing | MultipartError::ContentTypeIncompatible => {
                AppError::InvalidInput("Request must be multipart/form-data".to_string())
            }
            MultipartError::Payload(_) => {
                AppError::PayloadTooLarge("Upload exceeds the allowed size".to_string())
            }
            _ => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// Failures talking to the remote media store.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum MediaError {
    #[display("Unsupported image format: {_0}")]
    UnsupportedFormat(String),

    #[display("Media store request timed out")]
    Timeout,

    #[display("Media store request failed: {_0}")]
    Request(String),

    #[display("Media store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[display("Unexpected media store response: {_0}")]
    InvalidResponse(String),

    #[display("Cannot derive a media id from URL: {_0}")]
    InvalidUrl(String),

    #[display("Media client error: {_0}")]
    Client(String),
}

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MediaError::Timeout
        } else if err.is_decode() {
            MediaError::InvalidResponse(err.to_string())
        } else {
            MediaError::Request(err.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
