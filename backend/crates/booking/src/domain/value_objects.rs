//! Domain Value Objects
//!
//! Immutable value types for the booking domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Appointment status. Free text: any value may follow any other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentStatus(String);

impl AppointmentStatus {
    pub const CONFIRMED: &'static str = "Confirmed";

    /// Blank input falls back to `Confirmed`
    pub fn new(status: impl Into<String>) -> Self {
        let status = status.into();
        let trimmed = status.trim();
        if trimmed.is_empty() {
            Self::confirmed()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn confirmed() -> Self {
        Self(Self::CONFIRMED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::confirmed()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Merchant-side reference sent to the gateway with a new payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRef(String);

impl TransactionRef {
    const PREFIX: &'static str = "foodmed";

    pub fn generate() -> Self {
        Self(format!("{}-{}", Self::PREFIX, Uuid::new_v4().simple()))
    }

    /// Whether `raw` has the shape of a reference generated here
    pub fn is_ours(raw: &str) -> bool {
        raw.strip_prefix(Self::PREFIX)
            .is_some_and(|rest| rest.starts_with('-'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercased, trimmed email used to find the paying patient
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
