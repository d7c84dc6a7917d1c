//! Shared Kernel
//!
//! Vocabulary shared by every FoodMed crate:
//! - The unified [`error::app_error::AppError`] returned to HTTP clients
//! - Typed identifiers ([`id::Id`]) for accounts and appointments
//!
//! Nothing domain specific lives here; the account and booking crates
//! build their own error enums on top of these types.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
