//! Doctor Use Cases
//!
//! Doctors are accounts of kind `doctor`. Creation arrives as a multipart
//! form with an optional picture; updates are field merges.

use std::sync::Arc;

use kernel::id::AccountId;
use platform::image_host::{ImageHost, to_data_uri};

use crate::application::config::AccountConfig;
use crate::domain::entity::account::{Account, DoctorPatch, Profile};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    email::Email,
};
use crate::error::{AccountError, AccountResult};

/// Uploaded picture as received from the form
pub struct ImageUpload {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct CreateDoctorInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub specialty: String,
    pub overview: String,
    pub bio: String,
    pub location: String,
    pub image: Option<ImageUpload>,
}

pub struct CreateDoctorUseCase<A, I>
where
    A: AccountRepository,
    I: ImageHost,
{
    accounts: Arc<A>,
    images: Arc<I>,
    config: Arc<AccountConfig>,
}

impl<A, I> CreateDoctorUseCase<A, I>
where
    A: AccountRepository,
    I: ImageHost,
{
    pub fn new(accounts: Arc<A>, images: Arc<I>, config: Arc<AccountConfig>) -> Self {
        Self {
            accounts,
            images,
            config,
        }
    }

    pub async fn execute(&self, input: CreateDoctorInput) -> AccountResult<Account> {
        if input.name.trim().is_empty() || input.email.trim().is_empty() {
            return Err(AccountError::InvalidInput(
                "Name and email are required".to_string(),
            ));
        }

        let email = Email::new(input.email)?;

        if self.accounts.exists_by_email(&email).await? {
            return Err(AccountError::AccountExists);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = AccountPassword::from_raw(&raw_password, self.config.pepper())?;

        let profile_image = match input.image.filter(|image| !image.bytes.is_empty()) {
            Some(image) => {
                let data_uri = to_data_uri(image.content_type.as_deref(), &image.bytes);
                self.images
                    .upload(&data_uri)
                    .await
                    .map_err(|e| AccountError::upstream("Image upload failed", e))?
            }
            None => String::new(),
        };

        let account = Account::new_doctor(
            email,
            password_hash,
            Profile {
                name: input.name.trim().to_string(),
                phone: input.phone.trim().to_string(),
                profile_image,
                bio: input.bio,
                location: input.location,
            },
            input.specialty,
            input.overview,
        );

        self.accounts.create(&account).await?;

        tracing::info!(
            doctor_id = %account.account_id,
            email = %account.email,
            "Doctor created"
        );

        Ok(account)
    }
}

pub struct ListDoctorsUseCase<A>
where
    A: AccountRepository,
{
    accounts: Arc<A>,
}

impl<A> ListDoctorsUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self) -> AccountResult<Vec<Account>> {
        self.accounts.list_doctors().await
    }
}

pub struct UpdateDoctorUseCase<A>
where
    A: AccountRepository,
{
    accounts: Arc<A>,
}

impl<A> UpdateDoctorUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self, doctor_id: &str, patch: DoctorPatch) -> AccountResult<Account> {
        // An id that is not even a uuid cannot name a doctor
        let doctor_id: AccountId = doctor_id
            .parse()
            .map_err(|_| AccountError::AccountNotFound)?;

        if patch.is_empty() {
            return Err(AccountError::InvalidInput("No fields to update".to_string()));
        }

        let doctor = self
            .accounts
            .update_doctor(&doctor_id, &patch)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        tracing::info!(doctor_id = %doctor_id, "Doctor updated");
        Ok(doctor)
    }
}
