//! Domain Entities
//!
//! Appointments plus the slices of doctor/patient accounts the booking
//! workflow reads and writes.

use chrono::{DateTime, SecondsFormat, Utc};
use kernel::id::{AccountId, AppointmentId};

use crate::domain::value_objects::AppointmentStatus;

/// Appointment between a doctor and a patient account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub appointment_id: AppointmentId,
    pub doctor_id: AccountId,
    pub patient_id: AccountId,
    /// ISO-8601 as given by the client, or the creation instant
    pub date: String,
    pub time: Option<String>,
    pub notes: String,
    pub status: AppointmentStatus,
    /// Gateway transaction id when created by payment reconciliation
    pub transaction_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Appointment fields as submitted; blanks get defaults
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub doctor_id: AccountId,
    pub patient_id: AccountId,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub transaction_ref: Option<String>,
}

impl NewAppointment {
    pub fn new(doctor_id: AccountId, patient_id: AccountId) -> Self {
        Self {
            doctor_id,
            patient_id,
            date: None,
            time: None,
            notes: None,
            status: None,
            transaction_ref: None,
        }
    }
}

impl Appointment {
    /// date = now, time = none, notes = "", status = Confirmed
    pub fn new(new: NewAppointment) -> Self {
        let now = Utc::now();
        let date = non_blank(new.date)
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

        Self {
            appointment_id: AppointmentId::new(),
            doctor_id: new.doctor_id,
            patient_id: new.patient_id,
            date,
            time: non_blank(new.time),
            notes: new.notes.unwrap_or_default(),
            status: new.status.map(AppointmentStatus::new).unwrap_or_default(),
            transaction_ref: new.transaction_ref,
            created_at: now,
            updated_at: now,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Field merge for an existing appointment; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl AppointmentPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, appointment: &mut Appointment) {
        if let Some(date) = &self.date {
            appointment.date.clone_from(date);
        }
        if let Some(time) = &self.time {
            appointment.time = Some(time.clone());
        }
        if let Some(notes) = &self.notes {
            appointment.notes.clone_from(notes);
        }
        if let Some(status) = &self.status {
            appointment.status = AppointmentStatus::new(status.as_str());
        }
        appointment.updated_at = Utc::now();
    }
}

/// Name and contact details of either party
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub profile_image: String,
    /// Doctors only
    pub specialty: Option<String>,
}

/// Appointment enriched with both parties
#[derive(Debug, Clone)]
pub struct AppointmentView {
    pub appointment: Appointment,
    pub doctor: Option<Contact>,
    pub patient: Option<Contact>,
}

/// Doctor as seen by the reconciliation workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorContact {
    pub doctor_id: AccountId,
    pub name: String,
    pub email: String,
}

/// Aggregate stats after an increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoctorStats {
    pub patients_count: i32,
    pub stars: i16,
}

/// A verified gateway transaction being applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentClaim {
    pub transaction_id: String,
    pub doctor_id: AccountId,
    pub patient_email: String,
}
