use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// API service domain error variants.
///
/// `InvalidCredentials` deliberately carries one message for both unknown
/// email and wrong password so login failures cannot be used to enumerate
/// accounts.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("patient not found")]
    PatientNotFound,
    #[error("prescription not found")]
    PrescriptionNotFound,
    #[error("email already taken")]
    EmailTaken,
    #[error("national id already taken")]
    NationalIdTaken,
    #[error("order number already taken")]
    OrderNumberTaken,
    #[error("invalid status transition")]
    InvalidStatusTransition,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::PatientNotFound => "PATIENT_NOT_FOUND",
            Self::PrescriptionNotFound => "PRESCRIPTION_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::NationalIdTaken => "NATIONAL_ID_TAKEN",
            Self::OrderNumberTaken => "ORDER_NUMBER_TAKEN",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Build a `Validation` error with a single field message.
    pub fn field(field: &str, message: &str) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::InvalidStatusTransition => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::PatientNotFound | Self::PrescriptionNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::EmailTaken | Self::NationalIdTaken | Self::OrderNumberTaken => {
                StatusCode::CONFLICT
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status
        // for all requests. 4xx are expected client errors; logging them here
        // would be noise. Internal errors need the anyhow chain logged so the
        // root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = match &self {
            Self::Validation(errors) => serde_json::json!({
                "kind": self.kind(),
                "message": self.to_string(),
                "errors": errors,
            }),
            _ => serde_json::json!({
                "kind": self.kind(),
                "message": self.to_string(),
            }),
        };
        (status, axum::Json(body)).into_response()
    }
}
