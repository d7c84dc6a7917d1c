//! Infrastructure Layer
//!
//! PostgreSQL repositories and the Flutterwave gateway client.

pub mod flutterwave;
#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use flutterwave::{FlutterwaveConfig, FlutterwaveGateway};
pub use postgres::PgBookingRepository;
