//! Reset Password Use Case
//!
//! The caller proves control of the email with a live OTP first.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::otp::VerifyOtpUseCase;
use crate::domain::repository::{AccountRepository, OtpRepository};
use crate::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    email::Email,
};
use crate::error::{AccountError, AccountResult};

pub struct ResetPasswordInput {
    pub email: String,
    pub otp: String,
    pub password: String,
    pub confirm: String,
}

pub struct ResetPasswordUseCase<A, O>
where
    A: AccountRepository,
    O: OtpRepository,
{
    accounts: Arc<A>,
    verify_otp: VerifyOtpUseCase<O>,
    config: Arc<AccountConfig>,
}

impl<A, O> ResetPasswordUseCase<A, O>
where
    A: AccountRepository,
    O: OtpRepository,
{
    pub fn new(accounts: Arc<A>, otps: Arc<O>, config: Arc<AccountConfig>) -> Self {
        Self {
            accounts,
            verify_otp: VerifyOtpUseCase::new(otps, config.clone()),
            config,
        }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AccountResult<()> {
        if input.password != input.confirm {
            return Err(AccountError::PasswordMismatch);
        }

        self.verify_otp.execute(input.email.clone(), &input.otp).await?;

        let email = Email::new(input.email)?;
        let raw_password = RawPassword::new(input.password)?;
        let password_hash = AccountPassword::from_raw(&raw_password, self.config.pepper())?;

        if !self.accounts.update_password(&email, &password_hash).await? {
            return Err(AccountError::AccountNotFound);
        }

        tracing::info!(email = %email, "Password reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_in::{SignInInput, SignInUseCase};
    use crate::domain::entity::otp::OtpRecord;
    use crate::domain::value_object::otp_code::OtpCode;
    use crate::infra::memory::MemoryAccountRepository;
    use chrono::{Duration, Utc};

    fn input(email: &str, otp: &str, password: &str, confirm: &str) -> ResetPasswordInput {
        ResetPasswordInput {
            email: email.into(),
            otp: otp.into(),
            password: password.into(),
            confirm: confirm.into(),
        }
    }

    async fn store_otp(repo: &MemoryAccountRepository, email: &str, code: &str, age: Duration) {
        let record = OtpRecord {
            email: Email::new(email).unwrap(),
            code: OtpCode::from_db(code),
            issued_at: Utc::now() - age,
        };
        OtpRepository::upsert_otp(repo, &record).await.unwrap();
    }

    fn use_case(
        repo: &MemoryAccountRepository,
    ) -> ResetPasswordUseCase<MemoryAccountRepository, MemoryAccountRepository> {
        ResetPasswordUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(AccountConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_reset_then_login_with_new_password() {
        let repo = MemoryAccountRepository::default();
        repo.seed_user("ada@example.com", "jollof-rice-7");
        store_otp(&repo, "ada@example.com", "482913", Duration::minutes(1)).await;

        use_case(&repo)
            .execute(input("ada@example.com", "482913", "egusi-soup-42", "egusi-soup-42"))
            .await
            .unwrap();

        let sign_in = SignInUseCase::new(Arc::new(repo.clone()), Arc::new(AccountConfig::default()));
        let old = sign_in
            .execute(SignInInput {
                email: "ada@example.com".into(),
                password: "jollof-rice-7".into(),
            })
            .await;
        assert!(matches!(old, Err(AccountError::InvalidCredentials)));

        sign_in
            .execute(SignInInput {
                email: "ada@example.com".into(),
                password: "egusi-soup-42".into(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_refused_without_valid_otp() {
        let repo = MemoryAccountRepository::default();
        repo.seed_user("ada@example.com", "jollof-rice-7");
        let use_case = use_case(&repo);

        // nothing issued yet
        let err = use_case
            .execute(input("ada@example.com", "", "egusi-soup-42", "egusi-soup-42"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidOtp));
        assert_eq!(err.status_code().as_u16(), 400);

        store_otp(&repo, "ada@example.com", "482913", Duration::minutes(1)).await;
        let err = use_case
            .execute(input("ada@example.com", "482914", "egusi-soup-42", "egusi-soup-42"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidOtp));

        store_otp(&repo, "ada@example.com", "482913", Duration::minutes(6)).await;
        let err = use_case
            .execute(input("ada@example.com", "482913", "egusi-soup-42", "egusi-soup-42"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::OtpExpired));

        // the old password still works
        SignInUseCase::new(Arc::new(repo.clone()), Arc::new(AccountConfig::default()))
            .execute(SignInInput {
                email: "ada@example.com".into(),
                password: "jollof-rice-7".into(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mismatch_and_unknown_email() {
        let repo = MemoryAccountRepository::default();
        let use_case = use_case(&repo);

        let err = use_case
            .execute(input("ada@example.com", "482913", "egusi-soup-42", "egusi-soup-43"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::PasswordMismatch));
        assert_eq!(err.status_code().as_u16(), 400);

        // a live code for an email with no account behind it
        store_otp(&repo, "ghost@example.com", "482913", Duration::minutes(1)).await;
        let err = use_case
            .execute(input("ghost@example.com", "482913", "egusi-soup-42", "egusi-soup-42"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AccountNotFound));
    }
}
