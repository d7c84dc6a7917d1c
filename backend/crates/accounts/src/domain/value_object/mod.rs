//! Value Object Module

pub mod account_kind;
pub mod account_password;
pub mod email;
pub mod otp_code;
