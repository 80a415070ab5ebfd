//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidVar { var: &'static str, value: String },
    #[error("invalid validation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Body is sent verbatim as text, e.g. "Show not found".
    #[error("{0}")]
    NotFound(String),
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Body could not be read at all, e.g. it exceeded the size limit.
    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }
}

/// One failed field rule, shaped the way request validators conventionally report them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    pub msg: String,
    pub path: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn body(path: &str, value: Option<serde_json::Value>, msg: &str) -> Self {
        FieldError {
            kind: "field",
            value,
            msg: msg.to_string(),
            path: path.to_string(),
            location: "body",
        }
    }
}

#[derive(Serialize)]
pub struct ValidationBody {
    pub errors: Vec<FieldError>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = match self {
            AppError::NotFound(message) => return (StatusCode::NOT_FOUND, message).into_response(),
            AppError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(ValidationBody { errors })).into_response()
            }
            AppError::Body(rejection) => return rejection.into_response(),
            other => other,
        };
        let (status, code) = match &err {
            AppError::Db(e) => {
                tracing::error!(error = %e, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: err.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
