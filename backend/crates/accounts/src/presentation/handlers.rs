//! HTTP Handlers

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use std::sync::Arc;

use platform::image_host::ImageHost;
use platform::mailer::Mailer;

use crate::application::config::AccountConfig;
use crate::application::{
    CreateDoctorInput, CreateDoctorUseCase, GetProfileUseCase, ImageUpload, IssueOtpUseCase,
    ListDoctorsUseCase, ProfileSetupInput, ProfileSetupUseCase, ResetPasswordInput,
    ResetPasswordUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
    UpdateDoctorUseCase, VerifyOtpUseCase,
};
use crate::domain::repository::{AccountRepository, OtpRepository};
use crate::error::{AccountError, AccountResult};
use crate::presentation::dto::{
    AccountSummary, DoctorCreatedResponse, DoctorResponse, DoctorUpdatedResponse,
    MessageResponse, ProfileQuery, ProfileResponse, ProfileSetupRequest, ProfileSetupResponse,
    ResetPasswordRequest, SendOtpRequest, SignInRequest, SignInResponse, SignUpRequest,
    SignUpResponse, UpdateDoctorRequest, VerifyOtpRequest,
};

/// Account store + OTP ledger usable from handlers
pub trait AccountStore: AccountRepository + OtpRepository + Clone + Send + Sync + 'static {}

impl<T> AccountStore for T where T: AccountRepository + OtpRepository + Clone + Send + Sync + 'static {}

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountAppState<R, M, I>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub images: Arc<I>,
    pub config: Arc<AccountConfig>,
}

// ============================================================================
// Sign Up / Sign In
// ============================================================================

/// POST /signup
pub async fn sign_up<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
    Json(req): Json<SignUpRequest>,
) -> AccountResult<Json<SignUpResponse>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
        confirm: req.confirm,
        phone: req.phone,
        can_donate: req.can_donate,
        can_request: req.can_request,
    };

    let account = use_case.execute(input).await?;

    Ok(Json(SignUpResponse {
        message: "Signup successful",
        user: AccountSummary::from(&account),
    }))
}

/// POST /login
pub async fn sign_in<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
    Json(req): Json<SignInRequest>,
) -> AccountResult<Json<SignInResponse>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(SignInResponse {
        message: "You have logged in successfully",
        account: AccountSummary::from(&output.account),
        redirect: output.redirect,
    }))
}

// ============================================================================
// OTP / Password Reset
// ============================================================================

/// POST /send-otp
pub async fn send_otp<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
    Json(req): Json<SendOtpRequest>,
) -> AccountResult<Json<MessageResponse>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let use_case = IssueOtpUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(req.email).await?;

    Ok(Json(MessageResponse::new("OTP sent to email")))
}

/// POST /verify-otp
pub async fn verify_otp<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
    Json(req): Json<VerifyOtpRequest>,
) -> AccountResult<Json<MessageResponse>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let use_case = VerifyOtpUseCase::new(state.repo.clone(), state.config.clone());

    use_case.execute(req.email, &req.otp).await?;

    Ok(Json(MessageResponse::new("OTP verified")))
}

/// POST /reset-password
pub async fn reset_password<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
    Json(req): Json<ResetPasswordRequest>,
) -> AccountResult<Json<MessageResponse>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    use_case
        .execute(ResetPasswordInput {
            email: req.email,
            otp: req.otp,
            password: req.password,
            confirm: req.confirm,
        })
        .await?;

    Ok(Json(MessageResponse::new("Password reset successful")))
}

// ============================================================================
// Profile
// ============================================================================

/// POST /profile-setup
pub async fn profile_setup<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
    Json(req): Json<ProfileSetupRequest>,
) -> AccountResult<Json<ProfileSetupResponse>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let use_case = ProfileSetupUseCase::new(state.repo.clone(), state.images.clone());

    let update = use_case
        .execute(ProfileSetupInput {
            email: req.email,
            profile_image: req.profile_image,
            bio: req.bio,
            location: req.location,
        })
        .await?;

    Ok(Json(ProfileSetupResponse {
        message: "Profile updated successfully",
        profile_image: update.profile_image,
        bio: update.bio,
    }))
}

/// GET /user-profile?email=
pub async fn user_profile<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
    Query(query): Query<ProfileQuery>,
) -> AccountResult<Json<ProfileResponse>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let account = GetProfileUseCase::new(state.repo.clone())
        .execute(query.email)
        .await?;

    Ok(Json(ProfileResponse::from(account)))
}

// ============================================================================
// Doctors
// ============================================================================

/// POST /doctors (multipart/form-data, optional `image` file)
pub async fn create_doctor<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
    multipart: Multipart,
) -> AccountResult<Json<DoctorCreatedResponse>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let input = read_doctor_form(multipart).await?;

    let use_case = CreateDoctorUseCase::new(
        state.repo.clone(),
        state.images.clone(),
        state.config.clone(),
    );
    let doctor = use_case.execute(input).await?;

    Ok(Json(DoctorCreatedResponse {
        message: "Doctor created",
        id: doctor.account_id.to_string(),
    }))
}

async fn read_doctor_form(mut multipart: Multipart) -> AccountResult<CreateDoctorInput> {
    let mut input = CreateDoctorInput::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" || name == "profileImage" {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(form_error)?;
            input.image = Some(ImageUpload {
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(form_error)?;
        match name.as_str() {
            "name" => input.name = value,
            "email" => input.email = value,
            "password" => input.password = value,
            "phone" => input.phone = value,
            "specialty" => input.specialty = value,
            "overview" => input.overview = value,
            "bio" => input.bio = value,
            "location" => input.location = value,
            _ => tracing::debug!(field = %name, "Ignoring unknown doctor form field"),
        }
    }

    Ok(input)
}

fn form_error(err: axum::extract::multipart::MultipartError) -> AccountError {
    tracing::debug!(error = %err, "Failed to parse doctor form");
    AccountError::InvalidInput("Error parsing form data".to_string())
}

/// GET /doctors
pub async fn list_doctors<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
) -> AccountResult<Json<Vec<DoctorResponse>>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let doctors = ListDoctorsUseCase::new(state.repo.clone()).execute().await?;

    Ok(Json(doctors.into_iter().map(DoctorResponse::from).collect()))
}

/// PATCH /doctors/{id}
pub async fn update_doctor<R, M, I>(
    State(state): State<AccountAppState<R, M, I>>,
    Path(doctor_id): Path<String>,
    Json(req): Json<UpdateDoctorRequest>,
) -> AccountResult<Json<DoctorUpdatedResponse>>
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let doctor = UpdateDoctorUseCase::new(state.repo.clone())
        .execute(&doctor_id, req.into())
        .await?;

    Ok(Json(DoctorUpdatedResponse {
        message: "Doctor updated",
        doctor: DoctorResponse::from(doctor),
    }))
}
