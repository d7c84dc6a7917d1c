//! In-memory doubles for the account use cases and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use kernel::id::AccountId;
use platform::image_host::{ImageHost, ImageHostError};
use platform::mailer::{MailError, MailMessage, Mailer};

use crate::domain::entity::account::{
    Account, AccountDetails, DoctorPatch, Profile, ProfileUpdate, UserTraits,
};
use crate::domain::entity::otp::OtpRecord;
use crate::domain::repository::{AccountRepository, OtpRepository};
use crate::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    email::Email,
};
use crate::error::{AccountError, AccountResult};

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    otps: HashMap<Email, OtpRecord>,
}

/// Account store and OTP ledger backed by a shared `Vec`/`HashMap`
#[derive(Clone, Default)]
pub struct MemoryAccountRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryAccountRepository {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }

    pub fn otp_count(&self) -> usize {
        self.lock().otps.len()
    }

    pub fn seed_user(&self, email: &str, password: &str) -> Account {
        let account = Account::new_user(
            Email::new(email).unwrap(),
            hash(password),
            Profile {
                name: "Ada Obi".into(),
                phone: "08030000000".into(),
                ..Default::default()
            },
            UserTraits {
                can_donate: true,
                can_request: false,
                food_preference: String::new(),
            },
        );
        self.lock().accounts.push(account.clone());
        account
    }

    pub fn seed_doctor(&self, email: &str, password: &str, patients_count: i32) -> Account {
        let mut account = Account::new_doctor(
            Email::new(email).unwrap(),
            hash(password),
            Profile {
                name: "Dr Bello".into(),
                ..Default::default()
            },
            "Nutrition".into(),
            String::new(),
        );
        if let AccountDetails::Doctor(doctor) = &mut account.details {
            doctor.patients_count = patients_count;
            doctor.stars = (patients_count / 10).min(5) as i16;
        }
        self.lock().accounts.push(account.clone());
        account
    }
}

fn hash(password: &str) -> AccountPassword {
    AccountPassword::from_raw(&RawPassword::new(password.to_string()).unwrap(), None).unwrap()
}

impl AccountRepository for MemoryAccountRepository {
    async fn create(&self, account: &Account) -> AccountResult<()> {
        let mut state = self.lock();
        if state.accounts.iter().any(|a| a.email == account.email) {
            return Err(AccountError::AccountExists);
        }
        state.accounts.push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        Ok(self
            .lock()
            .accounts
            .iter()
            .find(|a| a.account_id == *account_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        Ok(self.lock().accounts.iter().find(|a| a.email == *email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool> {
        Ok(self.lock().accounts.iter().any(|a| a.email == *email))
    }

    async fn update_password(
        &self,
        email: &Email,
        password: &AccountPassword,
    ) -> AccountResult<bool> {
        let mut state = self.lock();
        match state.accounts.iter_mut().find(|a| a.email == *email) {
            Some(account) => {
                account.password_hash = password.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_profile(&self, email: &Email, update: &ProfileUpdate) -> AccountResult<bool> {
        let mut state = self.lock();
        match state.accounts.iter_mut().find(|a| a.email == *email) {
            Some(account) => {
                account.profile.profile_image.clone_from(&update.profile_image);
                account.profile.bio.clone_from(&update.bio);
                account.profile.location.clone_from(&update.location);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_doctors(&self) -> AccountResult<Vec<Account>> {
        Ok(self
            .lock()
            .accounts
            .iter()
            .filter(|a| a.doctor().is_some())
            .cloned()
            .collect())
    }

    async fn update_doctor(
        &self,
        doctor_id: &AccountId,
        patch: &DoctorPatch,
    ) -> AccountResult<Option<Account>> {
        let mut state = self.lock();
        let Some(account) = state
            .accounts
            .iter_mut()
            .find(|a| a.account_id == *doctor_id && a.doctor().is_some())
        else {
            return Ok(None);
        };
        patch.apply(account);
        Ok(Some(account.clone()))
    }
}

impl OtpRepository for MemoryAccountRepository {
    async fn upsert_otp(&self, record: &OtpRecord) -> AccountResult<()> {
        self.lock().otps.insert(record.email.clone(), record.clone());
        Ok(())
    }

    async fn find_otp(&self, email: &Email) -> AccountResult<Option<OtpRecord>> {
        Ok(self.lock().otps.get(email).cloned())
    }
}

/// Keeps every message; can be told to fail the next send
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(MailError::Rejected {
                status: 503,
                body: "mailbox unavailable".into(),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Returns a fake hosted URL per upload
#[derive(Clone, Default)]
pub struct StubImageHost {
    uploads: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl StubImageHost {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl ImageHost for StubImageHost {
    async fn upload(&self, _file: &str) -> Result<String, ImageHostError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(ImageHostError::Rejected("Upload preset not found".into()));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("https://res.cloudinary.com/foodmed/image/upload/v1/{n}.png"))
    }
}
