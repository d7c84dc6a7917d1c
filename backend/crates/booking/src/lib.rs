//! Booking Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, rating rules, repository and gateway traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and Flutterwave implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Appointment ledger (create, list per doctor/patient, merge update)
//! - Payment initiation through a hosted checkout
//! - Payment reconciliation on the gateway callback
//!
//! ## Consistency Model
//! - A doctor's patient count and stars change in one statement
//! - Each gateway transaction is applied at most once
//! - Appointment and email steps after a verified payment never fail the
//!   callback

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::BookingConfig;
pub use error::{BookingError, BookingResult};
pub use infra::flutterwave::{FlutterwaveConfig, FlutterwaveGateway};
pub use infra::postgres::PgBookingRepository;
pub use presentation::router::booking_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
