//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod appointments;
pub mod config;
pub mod initiate_payment;
pub mod reconcile_payment;

pub use appointments::{
    CreateAppointmentInput, CreateAppointmentUseCase, ListAppointmentsUseCase,
    UpdateAppointmentUseCase,
};
pub use config::BookingConfig;
pub use initiate_payment::{InitiatePaymentInput, InitiatePaymentOutput, InitiatePaymentUseCase};
pub use reconcile_payment::{PaymentCallback, ReconcileOutcome, ReconcilePaymentUseCase};
