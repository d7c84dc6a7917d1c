//! Account Entity
//!
//! Users and doctors share one record shape: identity, credentials and the
//! public profile. What differs lives in [`AccountDetails`].

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{
    account_kind::AccountKind, account_password::AccountPassword, email::Email,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub phone: String,
    pub profile_image: String,
    pub bio: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTraits {
    pub can_donate: bool,
    pub can_request: bool,
    pub food_preference: String,
}

/// Doctor-only fields. `patients_count` and `stars` are owned by the
/// booking side and are read-only here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorProfile {
    pub specialty: String,
    pub overview: String,
    pub patients_count: i32,
    pub stars: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountDetails {
    User(UserTraits),
    Doctor(DoctorProfile),
}

#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub email: Email,
    pub password_hash: AccountPassword,
    pub profile: Profile,
    pub details: AccountDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new_user(
        email: Email,
        password_hash: AccountPassword,
        profile: Profile,
        traits: UserTraits,
    ) -> Self {
        Self::new(email, password_hash, profile, AccountDetails::User(traits))
    }

    /// New doctors start with no patients and no stars
    pub fn new_doctor(
        email: Email,
        password_hash: AccountPassword,
        profile: Profile,
        specialty: String,
        overview: String,
    ) -> Self {
        let doctor = DoctorProfile {
            specialty,
            overview,
            patients_count: 0,
            stars: 0,
        };
        Self::new(email, password_hash, profile, AccountDetails::Doctor(doctor))
    }

    fn new(
        email: Email,
        password_hash: AccountPassword,
        profile: Profile,
        details: AccountDetails,
    ) -> Self {
        let now = Utc::now();
        Self {
            account_id: AccountId::new(),
            email,
            password_hash,
            profile,
            details,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> AccountKind {
        match self.details {
            AccountDetails::User(_) => AccountKind::User,
            AccountDetails::Doctor(_) => AccountKind::Doctor,
        }
    }

    pub fn user_traits(&self) -> Option<&UserTraits> {
        match &self.details {
            AccountDetails::User(traits) => Some(traits),
            AccountDetails::Doctor(_) => None,
        }
    }

    pub fn doctor(&self) -> Option<&DoctorProfile> {
        match &self.details {
            AccountDetails::Doctor(doctor) => Some(doctor),
            AccountDetails::User(_) => None,
        }
    }
}

/// Fields written by `POST /profile-setup`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub profile_image: String,
    pub bio: String,
    pub location: String,
}

/// Merge update for a doctor; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub specialty: Option<String>,
    pub overview: Option<String>,
}

impl DoctorPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, account: &mut Account) {
        let profile = &mut account.profile;
        merge(&mut profile.name, &self.name);
        merge(&mut profile.phone, &self.phone);
        merge(&mut profile.profile_image, &self.profile_image);
        merge(&mut profile.bio, &self.bio);
        merge(&mut profile.location, &self.location);

        if let AccountDetails::Doctor(doctor) = &mut account.details {
            merge(&mut doctor.specialty, &self.specialty);
            merge(&mut doctor.overview, &self.overview);
        }

        account.updated_at = Utc::now();
    }
}

fn merge(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}
