//! Sign In Use Case (credential verifier)
//!
//! Checks an email/password pair against the stored hash. Read-only: no
//! lockout counters, no sessions.

use std::sync::{Arc, LazyLock};

use crate::application::config::AccountConfig;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_kind::AccountKind,
    account_password::{AccountPassword, RawPassword},
    email::Email,
};
use crate::error::{AccountError, AccountResult};

pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Hash checked when no account owns the email, so both paths pay for Argon2
static ABSENT_ACCOUNT_HASH: LazyLock<Option<AccountPassword>> = LazyLock::new(|| {
    AccountPassword::from_raw(&RawPassword::attempt("absent-account".to_string()), None).ok()
});

#[derive(Debug)]
pub struct SignInOutput {
    pub account: Account,
    pub role: AccountKind,
    /// Frontend page to land on
    pub redirect: String,
}

pub struct SignInUseCase<A>
where
    A: AccountRepository,
{
    accounts: Arc<A>,
    config: Arc<AccountConfig>,
}

impl<A> SignInUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(accounts: Arc<A>, config: Arc<AccountConfig>) -> Self {
        Self { accounts, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AccountResult<SignInOutput> {
        // Malformed, unknown and wrong-password all look the same
        let email = Email::new(input.email).map_err(|_| AccountError::InvalidCredentials)?;

        let attempt = RawPassword::attempt(input.password);

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            if let Some(hash) = ABSENT_ACCOUNT_HASH.as_ref() {
                hash.verify(&attempt, self.config.pepper());
            }
            return Err(AccountError::InvalidCredentials);
        };

        if !account.password_hash.verify(&attempt, self.config.pepper()) {
            return Err(AccountError::InvalidCredentials);
        }

        let role = account.kind();
        let redirect = match role {
            AccountKind::User => self.config.user_redirect.clone(),
            AccountKind::Doctor => self.config.doctor_redirect.clone(),
        };

        tracing::info!(
            account_id = %account.account_id,
            role = %role,
            "Account signed in"
        );

        Ok(SignInOutput {
            account,
            role,
            redirect,
        })
    }
}
