//! Appointment Use Cases
//!
//! Plain CRUD over the appointment ledger. Status changes are not
//! validated.

use std::str::FromStr;
use std::sync::Arc;

use kernel::id::{AccountId, AppointmentId};

use crate::domain::entities::{Appointment, AppointmentPatch, AppointmentView, NewAppointment};
use crate::domain::repository::AppointmentRepository;
use crate::error::{BookingError, BookingResult};

/// Create request as received; ids are still raw strings
#[derive(Debug, Clone, Default)]
pub struct CreateAppointmentInput {
    pub doctor_id: String,
    pub patient_id: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

pub struct CreateAppointmentUseCase<R>
where
    R: AppointmentRepository,
{
    repo: Arc<R>,
}

impl<R> CreateAppointmentUseCase<R>
where
    R: AppointmentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: CreateAppointmentInput) -> BookingResult<AppointmentView> {
        let doctor_id: AccountId = parse_id(&input.doctor_id, "doctorId")?;
        let patient_id: AccountId = parse_id(&input.patient_id, "patientId")?;

        let appointment = Appointment::new(NewAppointment {
            date: input.date,
            time: input.time,
            notes: input.notes,
            status: input.status,
            ..NewAppointment::new(doctor_id, patient_id)
        });

        self.repo.create(&appointment).await?;

        tracing::info!(
            appointment_id = %appointment.appointment_id,
            doctor_id = %doctor_id,
            patient_id = %patient_id,
            "Appointment created"
        );

        self.repo
            .find_view(&appointment.appointment_id)
            .await?
            .ok_or_else(|| BookingError::Internal("Created appointment vanished".to_string()))
    }
}

pub struct ListAppointmentsUseCase<R>
where
    R: AppointmentRepository,
{
    repo: Arc<R>,
}

impl<R> ListAppointmentsUseCase<R>
where
    R: AppointmentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn for_doctor(&self, doctor_id: &str) -> BookingResult<Vec<AppointmentView>> {
        let doctor_id: AccountId = parse_id(doctor_id, "doctor id")?;
        self.repo.list_by_doctor(&doctor_id).await
    }

    pub async fn for_patient(&self, patient_id: &str) -> BookingResult<Vec<AppointmentView>> {
        let patient_id: AccountId = parse_id(patient_id, "patient id")?;
        self.repo.list_by_patient(&patient_id).await
    }
}

pub struct UpdateAppointmentUseCase<R>
where
    R: AppointmentRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateAppointmentUseCase<R>
where
    R: AppointmentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        appointment_id: &str,
        patch: AppointmentPatch,
    ) -> BookingResult<Appointment> {
        let appointment_id = AppointmentId::from_str(appointment_id)
            .map_err(|_| BookingError::AppointmentNotFound)?;

        if patch.is_empty() {
            return Err(BookingError::InvalidInput("No fields to update".to_string()));
        }

        let appointment = self
            .repo
            .update(&appointment_id, &patch)
            .await?
            .ok_or(BookingError::AppointmentNotFound)?;

        tracing::info!(
            appointment_id = %appointment_id,
            status = %appointment.status,
            "Appointment updated"
        );

        Ok(appointment)
    }
}

fn parse_id(raw: &str, field: &str) -> BookingResult<AccountId> {
    if raw.trim().is_empty() {
        return Err(BookingError::InvalidInput(format!("{field} is required")));
    }
    raw.parse()
        .map_err(|_| BookingError::InvalidInput(format!("Invalid {field}")))
}
