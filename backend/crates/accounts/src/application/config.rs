//! Application Configuration
//!
//! Configuration for the account use cases.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// How long an issued OTP stays valid
    pub otp_ttl: Duration,
    /// Number of digits in an issued OTP
    pub otp_length: usize,
    pub otp_subject: String,
    /// Redirect hint returned on login for users
    pub user_redirect: String,
    /// Redirect hint returned on login for doctors
    pub doctor_redirect: String,
    /// Application-wide secret appended before hashing
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::from_secs(5 * 60),
            otp_length: 6,
            otp_subject: "Your FOODMED OTP Code".to_string(),
            user_redirect: "landing-page".to_string(),
            doctor_redirect: "doctor-dashboard".to_string(),
            password_pepper: None,
        }
    }
}

impl AccountConfig {
    pub fn with_pepper(pepper: Vec<u8>) -> Self {
        Self {
            password_pepper: Some(pepper),
            ..Default::default()
        }
    }

    pub fn otp_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.otp_ttl).unwrap_or(chrono::Duration::minutes(5))
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
