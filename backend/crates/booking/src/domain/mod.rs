//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Appointment, doctor/patient contacts)
//! - Domain value objects (AppointmentStatus, TransactionRef)
//! - Domain services (star rating)
//! - Repository and payment gateway traits (interfaces)

pub mod entities;
pub mod gateway;
pub mod repository;
pub mod services;
pub mod value_objects;
