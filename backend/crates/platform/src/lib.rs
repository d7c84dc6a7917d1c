//! Platform Crate - Technical Infrastructure
//!
//! Building blocks shared by the domain crates:
//! - Random codes and constant-time comparison
//! - Password hashing (Argon2id)
//! - Outbound email through an HTTP mail provider
//! - Image uploads to the image host

pub mod crypto;
pub mod image_host;
pub mod mailer;
pub mod password;
