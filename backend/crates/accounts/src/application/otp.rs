//! OTP Use Cases
//!
//! Issue a one-time code by email and check it before a password reset.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::mailer::{MailMessage, Mailer};

use crate::application::config::AccountConfig;
use crate::domain::entity::otp::OtpRecord;
use crate::domain::repository::{AccountRepository, OtpRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AccountError, AccountResult};

pub struct IssueOtpUseCase<A, O, M>
where
    A: AccountRepository,
    O: OtpRepository,
    M: Mailer,
{
    accounts: Arc<A>,
    otps: Arc<O>,
    mailer: Arc<M>,
    config: Arc<AccountConfig>,
}

impl<A, O, M> IssueOtpUseCase<A, O, M>
where
    A: AccountRepository,
    O: OtpRepository,
    M: Mailer,
{
    pub fn new(accounts: Arc<A>, otps: Arc<O>, mailer: Arc<M>, config: Arc<AccountConfig>) -> Self {
        Self {
            accounts,
            otps,
            mailer,
            config,
        }
    }

    /// Overwrites any earlier code for the email. The record is kept even
    /// if the email cannot be delivered.
    pub async fn execute(&self, email: String) -> AccountResult<()> {
        let email = Email::new(email)?;

        if !self.accounts.exists_by_email(&email).await? {
            return Err(AccountError::AccountNotFound);
        }

        let record = OtpRecord::issue(email, self.config.otp_length);
        self.otps.upsert_otp(&record).await?;

        let message = MailMessage::new(
            record.email.as_str(),
            &self.config.otp_subject,
            format!("Your OTP code is {}", record.code.as_str()),
        );

        self.mailer
            .send(&message)
            .await
            .map_err(|e| AccountError::upstream("Failed to send OTP", e))?;

        tracing::info!(email = %record.email, "OTP issued");
        Ok(())
    }
}

pub struct VerifyOtpUseCase<O>
where
    O: OtpRepository,
{
    otps: Arc<O>,
    config: Arc<AccountConfig>,
}

impl<O> VerifyOtpUseCase<O>
where
    O: OtpRepository,
{
    pub fn new(otps: Arc<O>, config: Arc<AccountConfig>) -> Self {
        Self { otps, config }
    }

    pub async fn execute(&self, email: String, code: &str) -> AccountResult<()> {
        self.execute_at(email, code, Utc::now()).await
    }

    /// Check `code` as of `now`. Success does not consume the code.
    pub async fn execute_at(
        &self,
        email: String,
        code: &str,
        now: DateTime<Utc>,
    ) -> AccountResult<()> {
        let email = Email::new(email).map_err(|_| AccountError::InvalidOtp)?;

        let record = self
            .otps
            .find_otp(&email)
            .await?
            .ok_or(AccountError::InvalidOtp)?;

        // An expired record is reported as such whatever code was sent
        if record.is_expired_at(now, self.config.otp_ttl_chrono()) {
            return Err(AccountError::OtpExpired);
        }

        if !record.code.matches(code) {
            return Err(AccountError::InvalidOtp);
        }

        tracing::debug!(email = %email, "OTP verified");
        Ok(())
    }
}
