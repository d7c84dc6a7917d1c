//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{AccountId, AppointmentId};

use crate::domain::entities::{
    Appointment, AppointmentPatch, AppointmentView, Contact, DoctorContact, DoctorStats,
    PaymentClaim,
};
use crate::error::BookingResult;

/// Appointment ledger
#[trait_variant::make(AppointmentRepository: Send)]
pub trait LocalAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> BookingResult<()>;

    async fn find_view(&self, appointment_id: &AppointmentId)
    -> BookingResult<Option<AppointmentView>>;

    /// Newest first
    async fn list_by_doctor(&self, doctor_id: &AccountId) -> BookingResult<Vec<AppointmentView>>;

    /// Newest first
    async fn list_by_patient(&self, patient_id: &AccountId)
    -> BookingResult<Vec<AppointmentView>>;

    /// Merge `patch`; `None` if no such appointment
    async fn update(
        &self,
        appointment_id: &AppointmentId,
        patch: &AppointmentPatch,
    ) -> BookingResult<Option<Appointment>>;
}

/// Doctor lookups and the aggregate stats they carry
#[trait_variant::make(DoctorLedger: Send)]
pub trait LocalDoctorLedger {
    async fn find_doctor(&self, doctor_id: &AccountId) -> BookingResult<Option<DoctorContact>>;

    /// Add one patient and recompute stars in a single atomic step.
    /// `None` if no such doctor.
    async fn record_patient(&self, doctor_id: &AccountId) -> BookingResult<Option<DoctorStats>>;
}

/// Patient lookups
#[trait_variant::make(PatientDirectory: Send)]
pub trait LocalPatientDirectory {
    /// `email` is already normalized
    async fn find_patient_by_email(&self, email: &str) -> BookingResult<Option<Contact>>;
}

/// Record of gateway transactions already applied
#[trait_variant::make(PaymentLedger: Send)]
pub trait LocalPaymentLedger {
    /// True if this call claimed the transaction, false if it was
    /// claimed before.
    async fn claim_payment(&self, claim: &PaymentClaim) -> BookingResult<bool>;
}

/// Everything the booking handlers need from one store
pub trait BookingStore: AppointmentRepository + DoctorLedger + PatientDirectory + PaymentLedger {}

impl<T> BookingStore for T where T: AppointmentRepository + DoctorLedger + PatientDirectory + PaymentLedger {}
