use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{email::Email, otp_code::OtpCode};

/// The single live OTP for an email. Issuing again overwrites it;
/// a successful check leaves it in place.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub email: Email,
    pub code: OtpCode,
    pub issued_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn issue(email: Email, length: usize) -> Self {
        Self {
            email,
            code: OtpCode::generate(length),
            issued_at: Utc::now(),
        }
    }

    /// Strictly more than `ttl` since issuance
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.issued_at > ttl
    }
}
