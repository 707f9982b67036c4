use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Account service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error("missing required fields")]
    MissingFields,
    #[error("invalid user id")]
    InvalidUserId,
    #[error("unsupported code type")]
    UnsupportedCodeType,
    #[error("invalid code format")]
    InvalidCodeFormat,
    #[error("no 2FA setup found")]
    TwoFactorNotFound,
    #[error("invalid code")]
    InvalidCode,
    #[error("unauthorized")]
    Unauthorized,
    #[error("deletion request not found")]
    DeletionRequestNotFound,
    #[error("account deletion already requested")]
    DeletionAlreadyRequested,
    #[error("account deletion already in progress")]
    DeletionInProgress,
    #[error("captcha verification failed")]
    CaptchaFailed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccountServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFields
            | Self::InvalidUserId
            | Self::UnsupportedCodeType
            | Self::InvalidCodeFormat => "VALIDATION_ERROR",
            Self::TwoFactorNotFound | Self::DeletionRequestNotFound => "NOT_FOUND",
            Self::InvalidCode => "INVALID_CODE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::DeletionAlreadyRequested | Self::DeletionInProgress => "CONFLICT",
            Self::CaptchaFailed => "CAPTCHA_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields
            | Self::InvalidUserId
            | Self::UnsupportedCodeType
            | Self::InvalidCodeFormat
            | Self::CaptchaFailed => StatusCode::BAD_REQUEST,
            Self::TwoFactorNotFound | Self::DeletionRequestNotFound => StatusCode::NOT_FOUND,
            // Existing clients read `success` from the body for a wrong code.
            Self::InvalidCode => StatusCode::OK,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::DeletionAlreadyRequested | Self::DeletionInProgress => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Full description for logs and operator notes, including the cause
    /// chain of internal errors that the HTTP body hides.
    pub fn detail(&self) -> String {
        match self {
            Self::Internal(e) => format!("{e:#}"),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AccountServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Only 500s are logged here; TraceLayer already records every status.
        // The anyhow chain is logged so the root cause is traceable.
        if let Self::Internal(_) = self {
            tracing::error!(error = %self.detail(), kind = "INTERNAL_ERROR", "internal error");
        }
        let body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
