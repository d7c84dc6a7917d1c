//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod doctors;
pub mod otp;
pub mod profile;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;

// Re-exports
pub use config::AccountConfig;
pub use doctors::{
    CreateDoctorInput, CreateDoctorUseCase, ImageUpload, ListDoctorsUseCase, UpdateDoctorUseCase,
};
pub use otp::{IssueOtpUseCase, VerifyOtpUseCase};
pub use profile::{GetProfileUseCase, ProfileSetupInput, ProfileSetupUseCase};
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
