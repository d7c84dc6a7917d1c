//! Account Error Types
//!
//! Account-specific error variants that render through the unified
//! `kernel::error::AppError` JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AccountResult<T> = Result<T, AccountError>;

#[derive(Debug, Error)]
pub enum AccountError {
    /// Missing or malformed request fields
    #[error("{0}")]
    InvalidInput(String),

    #[error("User already exists")]
    AccountExists,

    #[error("User not found")]
    AccountNotFound,

    /// Same message whether the email is unknown or the password is wrong
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Rejected by an application rule (email format, password policy).
    /// Keeps the rule's own message and action.
    #[error("{}", .0.message())]
    Rejected(AppError),

    /// Email or image provider failure. The detail is logged, the client
    /// only sees `message`.
    #[error("{message}")]
    Upstream {
        message: &'static str,
        detail: String,
    },

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    pub fn upstream(message: &'static str, detail: impl ToString) -> Self {
        AccountError::Upstream {
            message,
            detail: detail.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::InvalidInput(_)
            | AccountError::InvalidOtp
            | AccountError::OtpExpired
            | AccountError::PasswordMismatch => ErrorKind::BadRequest,
            AccountError::AccountExists => ErrorKind::Conflict,
            AccountError::AccountNotFound => ErrorKind::NotFound,
            AccountError::InvalidCredentials => ErrorKind::Unauthorized,
            AccountError::Rejected(err) => err.kind(),
            AccountError::Upstream { .. }
            | AccountError::Database(_)
            | AccountError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AccountError::Rejected(inner) => match inner.action() {
                Some(action) => err.with_action(action.to_string()),
                None => err,
            },
            AccountError::InvalidOtp => err.with_action("Request a new code and try again"),
            AccountError::OtpExpired => err.with_action("Request a new code"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::Upstream { message, detail } => {
                tracing::error!(message = %message, detail = %detail, "Upstream provider failure");
            }
            AccountError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AccountError::InvalidOtp => {
                tracing::warn!("Invalid OTP submitted");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AccountError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AccountError::Internal(err.to_string())
        } else {
            AccountError::Rejected(err)
        }
    }
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AccountError::AccountExists
            }
            _ => AccountError::Database(err),
        }
    }
}
