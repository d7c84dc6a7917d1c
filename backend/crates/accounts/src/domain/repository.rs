//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::AccountId;

use crate::domain::entity::account::{Account, DoctorPatch, ProfileUpdate};
use crate::domain::entity::otp::OtpRecord;
use crate::domain::value_object::{account_password::AccountPassword, email::Email};
use crate::error::AccountResult;

/// Account store (users and doctors)
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account. A concurrent insert of the same email
    /// surfaces as `AccountExists`.
    async fn create(&self, account: &Account) -> AccountResult<()>;

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>>;

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>>;

    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool>;

    /// Returns false when no account owns the email
    async fn update_password(&self, email: &Email, password: &AccountPassword)
    -> AccountResult<bool>;

    /// Returns false when no account owns the email
    async fn update_profile(&self, email: &Email, update: &ProfileUpdate) -> AccountResult<bool>;

    async fn list_doctors(&self) -> AccountResult<Vec<Account>>;

    /// Merge `patch` into a doctor account; `None` if no such doctor
    async fn update_doctor(
        &self,
        doctor_id: &AccountId,
        patch: &DoctorPatch,
    ) -> AccountResult<Option<Account>>;
}

/// OTP ledger: one live record per email
#[trait_variant::make(OtpRepository: Send)]
pub trait LocalOtpRepository {
    /// Insert or overwrite the record for `record.email`
    async fn upsert_otp(&self, record: &OtpRecord) -> AccountResult<()>;

    async fn find_otp(&self, email: &Email) -> AccountResult<Option<OtpRecord>>;
}
