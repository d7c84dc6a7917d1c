//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{CreateAppointmentInput, InitiatePaymentInput, PaymentCallback};
use crate::domain::entities::{Appointment, AppointmentPatch, AppointmentView, Contact};

// ============================================================================
// Payments
// ============================================================================

/// Request for POST /pay
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayRequest {
    pub doctor_id: String,
    pub patient_email: String,
    pub patient_name: Option<String>,
    pub amount: Option<u64>,
}

impl From<PayRequest> for InitiatePaymentInput {
    fn from(req: PayRequest) -> Self {
        Self {
            doctor_id: req.doctor_id,
            patient_email: req.patient_email,
            patient_name: req.patient_name,
            amount: req.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    pub message: &'static str,
    pub link: String,
    pub tx_ref: String,
}

/// Query of GET /payment-success. The gateway appends `transaction_id`
/// (and its own `status`, which is ignored) to the redirect URL we gave it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentCallbackQuery {
    #[serde(alias = "transaction_id")]
    pub transaction_id: Option<String>,
    #[serde(alias = "doctor_id")]
    pub doctor_id: Option<String>,
    #[serde(alias = "patient_email")]
    pub patient_email: Option<String>,
}

impl From<PaymentCallbackQuery> for PaymentCallback {
    fn from(query: PaymentCallbackQuery) -> Self {
        Self {
            transaction_id: query.transaction_id,
            doctor_id: query.doctor_id,
            patient_email: query.patient_email,
        }
    }
}

// ============================================================================
// Appointments
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAppointmentRequest {
    pub doctor_id: String,
    pub patient_id: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl From<CreateAppointmentRequest> for CreateAppointmentInput {
    fn from(req: CreateAppointmentRequest) -> Self {
        Self {
            doctor_id: req.doctor_id,
            patient_id: req.patient_id,
            date: req.date,
            time: req.time,
            notes: req.notes,
            status: req.status,
        }
    }
}

/// Merge update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAppointmentRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl From<UpdateAppointmentRequest> for AppointmentPatch {
    fn from(req: UpdateAppointmentRequest) -> Self {
        Self {
            date: req.date,
            time: req.time,
            notes: req.notes,
            status: req.status,
        }
    }
}

/// Counterpart details embedded in an appointment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub profile_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.account_id.to_string(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            profile_image: contact.profile_image,
            specialty: contact.specialty,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: String,
    pub doctor_id: String,
    pub patient_id: String,
    pub date: String,
    pub time: Option<String>,
    pub notes: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<ContactResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<ContactResponse>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.appointment_id.to_string(),
            doctor_id: appointment.doctor_id.to_string(),
            patient_id: appointment.patient_id.to_string(),
            date: appointment.date,
            time: appointment.time,
            notes: appointment.notes,
            status: appointment.status.to_string(),
            transaction_ref: appointment.transaction_ref,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
            doctor: None,
            patient: None,
        }
    }
}

impl From<AppointmentView> for AppointmentResponse {
    fn from(view: AppointmentView) -> Self {
        Self {
            doctor: view.doctor.map(ContactResponse::from),
            patient: view.patient.map(ContactResponse::from),
            ..Self::from(view.appointment)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentUpdatedResponse {
    pub message: &'static str,
    pub appointment: AppointmentResponse,
}
