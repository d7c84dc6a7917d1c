//! Sign Up Use Case
//!
//! Creates a new user (non-doctor) account.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::entity::account::{Account, Profile, UserTraits};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    email::Email,
};
use crate::error::{AccountError, AccountResult};

pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub phone: String,
    pub can_donate: Option<bool>,
    pub can_request: Option<bool>,
}

impl SignUpInput {
    /// Every field is required and the two passwords must agree
    fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.password.is_empty()
            && self.password == self.confirm
            && !self.phone.trim().is_empty()
            && self.can_donate.is_some()
            && self.can_request.is_some()
    }
}

pub struct SignUpUseCase<A>
where
    A: AccountRepository,
{
    accounts: Arc<A>,
    config: Arc<AccountConfig>,
}

impl<A> SignUpUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(accounts: Arc<A>, config: Arc<AccountConfig>) -> Self {
        Self { accounts, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AccountResult<Account> {
        if !input.is_complete() {
            return Err(AccountError::InvalidInput("Invalid input".to_string()));
        }

        let email = Email::new(input.email)?;

        // The unique index catches the race this check leaves open
        if self.accounts.exists_by_email(&email).await? {
            return Err(AccountError::AccountExists);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = AccountPassword::from_raw(&raw_password, self.config.pepper())?;

        let account = Account::new_user(
            email,
            password_hash,
            Profile {
                name: input.name.trim().to_string(),
                phone: input.phone.trim().to_string(),
                ..Default::default()
            },
            UserTraits {
                can_donate: input.can_donate.unwrap_or_default(),
                can_request: input.can_request.unwrap_or_default(),
                food_preference: String::new(),
            },
        );

        self.accounts.create(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            email = %account.email,
            "User signed up"
        );

        Ok(account)
    }
}
