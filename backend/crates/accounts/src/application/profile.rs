//! Profile Use Cases
//!
//! Profile setup uploads the picture to the image host first and stores
//! only the returned URL.

use std::sync::Arc;

use platform::image_host::ImageHost;

use crate::domain::entity::account::{Account, ProfileUpdate};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AccountError, AccountResult};

pub struct ProfileSetupInput {
    pub email: String,
    /// Data URI or base64 payload from the browser
    pub profile_image: String,
    pub bio: String,
    pub location: String,
}

impl ProfileSetupInput {
    fn is_complete(&self) -> bool {
        [&self.email, &self.profile_image, &self.bio, &self.location]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

pub struct ProfileSetupUseCase<A, I>
where
    A: AccountRepository,
    I: ImageHost,
{
    accounts: Arc<A>,
    images: Arc<I>,
}

impl<A, I> ProfileSetupUseCase<A, I>
where
    A: AccountRepository,
    I: ImageHost,
{
    pub fn new(accounts: Arc<A>, images: Arc<I>) -> Self {
        Self { accounts, images }
    }

    /// Returns the stored update (with the hosted image URL)
    pub async fn execute(&self, input: ProfileSetupInput) -> AccountResult<ProfileUpdate> {
        if !input.is_complete() {
            return Err(AccountError::InvalidInput(
                "Missing required fields".to_string(),
            ));
        }

        let email = Email::new(input.email)?;

        let image_url = self
            .images
            .upload(&input.profile_image)
            .await
            .map_err(|e| AccountError::upstream("Image upload failed", e))?;

        let update = ProfileUpdate {
            profile_image: image_url,
            bio: input.bio,
            location: input.location,
        };

        if !self.accounts.update_profile(&email, &update).await? {
            return Err(AccountError::AccountNotFound);
        }

        tracing::info!(email = %email, "Profile updated");
        Ok(update)
    }
}

pub struct GetProfileUseCase<A>
where
    A: AccountRepository,
{
    accounts: Arc<A>,
}

impl<A> GetProfileUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self, email: Option<String>) -> AccountResult<Account> {
        let email = email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AccountError::InvalidInput("Email query parameter is required".into()))?;
        let email = Email::new(email)?;

        self.accounts
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::AccountNotFound)
    }
}
