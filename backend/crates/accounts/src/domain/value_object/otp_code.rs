//! One-time code sent by email before a password reset.

use platform::crypto::{constant_time_eq, random_digits};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn generate(length: usize) -> Self {
        Self(random_digits(length))
    }

    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against user input; surrounding whitespace is ignored
    pub fn matches(&self, input: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), input.trim().as_bytes())
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OtpCode").field(&"******").finish()
    }
}
