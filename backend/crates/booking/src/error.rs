//! Booking Error Types
//!
//! This module provides booking-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::gateway::GatewayError;

/// Booking-specific result type alias
pub type BookingResult<T> = Result<T, BookingError>;

#[derive(Debug, Error)]
pub enum BookingError {
    /// Missing or malformed request fields
    #[error("{0}")]
    InvalidInput(String),

    /// Gateway callback without transaction id, doctor id or patient email
    #[error("Missing payment parameters")]
    MissingParameters,

    /// Gateway reported anything other than `successful`
    #[error("Payment not verified (status: {status})")]
    PaymentNotVerified { status: String },

    /// Verified transaction whose `tx_ref` was not issued by this service
    #[error("Payment was not initiated here")]
    ForeignPayment { tx_ref: String },

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    /// Gateway failure. Details are logged; the client sees a fixed message.
    #[error("Payment gateway error")]
    Gateway(#[source] GatewayError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BookingError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::InvalidInput(_)
            | BookingError::MissingParameters
            | BookingError::PaymentNotVerified { .. }
            | BookingError::ForeignPayment { .. } => ErrorKind::BadRequest,
            BookingError::DoctorNotFound | BookingError::AppointmentNotFound => {
                ErrorKind::NotFound
            }
            BookingError::Gateway(_) | BookingError::Database(_) | BookingError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Short machine-readable reason, used on failure redirects
    pub fn reason(&self) -> &'static str {
        match self {
            BookingError::InvalidInput(_) => "invalid_input",
            BookingError::MissingParameters => "missing_parameters",
            BookingError::PaymentNotVerified { .. } | BookingError::ForeignPayment { .. } => {
                "payment_not_verified"
            }
            BookingError::DoctorNotFound => "doctor_not_found",
            BookingError::AppointmentNotFound => "appointment_not_found",
            BookingError::Gateway(_) => "gateway_error",
            BookingError::Database(_) | BookingError::Internal(_) => "internal_error",
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            BookingError::Database(e) => {
                tracing::error!(error = %e, "Booking database error");
            }
            BookingError::Internal(msg) => {
                tracing::error!(message = %msg, "Booking internal error");
            }
            BookingError::Gateway(e) => {
                tracing::error!(error = %e, "Payment gateway error");
            }
            BookingError::PaymentNotVerified { status } => {
                tracing::warn!(status = %status, "Payment not verified");
            }
            BookingError::ForeignPayment { tx_ref } => {
                tracing::warn!(tx_ref = %tx_ref, "Verified payment has a foreign tx_ref");
            }
            _ => {
                tracing::debug!(error = %self, "Booking error");
            }
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<GatewayError> for BookingError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidTransactionId(_) => {
                BookingError::InvalidInput("Invalid transaction id".to_string())
            }
            other => BookingError::Gateway(other),
        }
    }
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                BookingError::InvalidInput("Doctor or patient does not exist".to_string())
            }
            _ => BookingError::Database(err),
        }
    }
}
