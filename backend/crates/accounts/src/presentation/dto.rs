//! API DTOs (Data Transfer Objects)
//!
//! Field names are camelCase on the wire to match the web frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::account::{Account, DoctorPatch};
use crate::domain::value_object::account_kind::AccountKind;

/// `{"message": ...}` acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request. Missing fields deserialize as empty and are rejected
/// by the use case with a 400.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub phone: String,
    pub can_donate: Option<bool>,
    pub can_request: Option<bool>,
}

/// Account summary returned by signup and login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: AccountKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_donate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_request: Option<bool>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        let traits = account.user_traits();
        Self {
            id: account.account_id.to_string(),
            name: account.profile.name.clone(),
            email: account.email.to_string(),
            phone: account.profile.phone.clone(),
            role: account.kind(),
            can_donate: traits.map(|t| t.can_donate),
            can_request: traits.map(|t| t.can_request),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpResponse {
    pub message: &'static str,
    pub user: AccountSummary,
}

// ============================================================================
// Sign In
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub account: AccountSummary,
    pub redirect: String,
}

// ============================================================================
// OTP / Password Reset
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
    pub confirm: String,
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSetupRequest {
    pub email: String,
    pub profile_image: String,
    pub bio: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSetupResponse {
    pub message: &'static str,
    pub profile_image: String,
    pub bio: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileQuery {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
    pub bio: String,
    pub profile_image: String,
    pub location: String,
    pub phone: String,
    pub can_donate: bool,
    pub can_request: bool,
}

impl From<Account> for ProfileResponse {
    fn from(account: Account) -> Self {
        let (can_donate, can_request) = account
            .user_traits()
            .map(|t| (t.can_donate, t.can_request))
            .unwrap_or_default();
        Self {
            name: account.profile.name,
            email: account.email.into_db(),
            bio: account.profile.bio,
            profile_image: account.profile.profile_image,
            location: account.profile.location,
            phone: account.profile.phone,
            can_donate,
            can_request,
        }
    }
}

// ============================================================================
// Doctors
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DoctorCreatedResponse {
    pub message: &'static str,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
    pub overview: String,
    pub bio: String,
    pub location: String,
    pub profile_image: String,
    pub patients_count: i32,
    pub stars: i16,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for DoctorResponse {
    fn from(account: Account) -> Self {
        let (specialty, overview, patients_count, stars) = match account.doctor() {
            Some(d) => (d.specialty.clone(), d.overview.clone(), d.patients_count, d.stars),
            None => Default::default(),
        };
        Self {
            id: account.account_id.to_string(),
            name: account.profile.name,
            email: account.email.into_db(),
            phone: account.profile.phone,
            specialty,
            overview,
            bio: account.profile.bio,
            location: account.profile.location,
            profile_image: account.profile.profile_image,
            patients_count,
            stars,
            created_at: account.created_at,
        }
    }
}

/// Merge update; absent fields are left untouched. Stats are not writable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub specialty: Option<String>,
    pub overview: Option<String>,
}

impl From<UpdateDoctorRequest> for DoctorPatch {
    fn from(req: UpdateDoctorRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            profile_image: req.profile_image,
            bio: req.bio,
            location: req.location,
            specialty: req.specialty,
            overview: req.overview,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorUpdatedResponse {
    pub message: &'static str,
    pub doctor: DoctorResponse,
}
