//! Reconcile Payment Use Case
//!
//! Runs when the gateway redirects the customer back after checkout:
//!
//! 1. read `transactionId`, `doctorId`, `patientEmail`
//! 2. verify the transaction with the gateway
//! 3. look up the doctor
//! 4. claim the gateway's own id for the transaction (a replayed callback
//!    stops here)
//! 5. add the patient to the doctor's stats (count and stars together)
//! 6. record a `Confirmed` appointment
//! 7. email doctor and patient
//!
//! Failures in 1-5 send the customer to the failure page. Failures in 6-7
//! are logged only. Nothing already applied is rolled back.

use std::sync::Arc;

use kernel::id::{AccountId, AppointmentId};
use platform::mailer::{MailMessage, Mailer};

use crate::application::config::BookingConfig;
use crate::domain::entities::{
    Appointment, DoctorContact, DoctorStats, NewAppointment, PaymentClaim,
};
use crate::domain::gateway::PaymentGateway;
use crate::domain::repository::BookingStore;
use crate::domain::value_objects::{AppointmentStatus, TransactionRef, normalize_email};
use crate::error::{BookingError, BookingResult};

/// Query parameters of the gateway callback
#[derive(Debug, Clone, Default)]
pub struct PaymentCallback {
    pub transaction_id: Option<String>,
    pub doctor_id: Option<String>,
    pub patient_email: Option<String>,
}

/// How a callback ended; every variant maps to a redirect
#[derive(Debug)]
pub enum ReconcileOutcome {
    Confirmed {
        transaction_id: String,
        stats: DoctorStats,
        appointment_id: Option<AppointmentId>,
    },
    /// The transaction was reconciled by an earlier callback
    AlreadyProcessed { transaction_id: String },
    Failed {
        doctor_id: String,
        patient_email: String,
        error: BookingError,
    },
}

impl ReconcileOutcome {
    pub fn redirect_url(&self, config: &BookingConfig) -> String {
        match self {
            ReconcileOutcome::Confirmed { transaction_id, .. }
            | ReconcileOutcome::AlreadyProcessed { transaction_id } => {
                config.success_url(transaction_id)
            }
            ReconcileOutcome::Failed {
                doctor_id,
                patient_email,
                error,
            } => config.failure_url(doctor_id, patient_email, error.reason()),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ReconcileOutcome::Failed { .. })
    }
}

struct Params {
    transaction_id: String,
    doctor_id: String,
    patient_email: String,
}

pub struct ReconcilePaymentUseCase<S, G, M>
where
    S: BookingStore,
    G: PaymentGateway,
    M: Mailer,
{
    store: Arc<S>,
    gateway: Arc<G>,
    mailer: Arc<M>,
}

impl<S, G, M> ReconcilePaymentUseCase<S, G, M>
where
    S: BookingStore,
    G: PaymentGateway,
    M: Mailer,
{
    pub fn new(store: Arc<S>, gateway: Arc<G>, mailer: Arc<M>) -> Self {
        Self {
            store,
            gateway,
            mailer,
        }
    }

    pub async fn execute(&self, callback: PaymentCallback) -> ReconcileOutcome {
        let doctor_id = callback.doctor_id.clone().unwrap_or_default();
        let patient_email = callback.patient_email.clone().unwrap_or_default();

        match self.confirm(callback).await {
            Ok(outcome) => outcome,
            Err(error) => {
                error.log();
                tracing::warn!(
                    doctor_id = %doctor_id,
                    patient_email = %patient_email,
                    reason = error.reason(),
                    "Payment reconciliation failed"
                );
                ReconcileOutcome::Failed {
                    doctor_id,
                    patient_email,
                    error,
                }
            }
        }
    }

    async fn confirm(&self, callback: PaymentCallback) -> BookingResult<ReconcileOutcome> {
        let params = required(callback)?;

        let verification = self.gateway.verify_transaction(&params.transaction_id).await?;
        if !verification.is_successful() {
            return Err(BookingError::PaymentNotVerified {
                status: verification.status,
            });
        }
        if let Some(tx_ref) = verification.tx_ref.filter(|r| !TransactionRef::is_ours(r)) {
            return Err(BookingError::ForeignPayment { tx_ref });
        }

        // Every spelling of the same transaction claims one key
        let params = Params {
            transaction_id: verification.transaction_id,
            ..params
        };

        let doctor_id: AccountId = params
            .doctor_id
            .parse()
            .map_err(|_| BookingError::DoctorNotFound)?;
        let doctor = self
            .store
            .find_doctor(&doctor_id)
            .await?
            .filter(|d| !d.email.trim().is_empty())
            .ok_or(BookingError::DoctorNotFound)?;

        let claim = PaymentClaim {
            transaction_id: params.transaction_id.clone(),
            doctor_id,
            patient_email: params.patient_email.clone(),
        };
        if !self.store.claim_payment(&claim).await? {
            tracing::info!(
                transaction_id = %params.transaction_id,
                "Payment already reconciled, skipping side effects"
            );
            return Ok(ReconcileOutcome::AlreadyProcessed {
                transaction_id: params.transaction_id,
            });
        }

        let stats = self
            .store
            .record_patient(&doctor_id)
            .await?
            .ok_or(BookingError::DoctorNotFound)?;

        tracing::info!(
            transaction_id = %params.transaction_id,
            doctor_id = %doctor_id,
            patients_count = stats.patients_count,
            stars = stats.stars,
            "Payment verified, doctor stats updated"
        );

        let appointment_id = self.record_appointment(&params, &doctor).await;
        self.notify(&params, &doctor).await;

        Ok(ReconcileOutcome::Confirmed {
            transaction_id: params.transaction_id,
            stats,
            appointment_id,
        })
    }

    /// Logged, never fatal
    async fn record_appointment(
        &self,
        params: &Params,
        doctor: &DoctorContact,
    ) -> Option<AppointmentId> {
        let patient = match self.store.find_patient_by_email(&params.patient_email).await {
            Ok(Some(patient)) => patient,
            Ok(None) => {
                tracing::warn!(
                    patient_email = %params.patient_email,
                    "Paying patient has no account, appointment not recorded"
                );
                return None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Patient lookup failed, appointment not recorded");
                return None;
            }
        };

        let appointment = Appointment::new(NewAppointment {
            notes: Some(format!(
                "Appointment confirmed after successful payment (transaction {})",
                params.transaction_id
            )),
            status: Some(AppointmentStatus::CONFIRMED.to_string()),
            transaction_ref: Some(params.transaction_id.clone()),
            ..NewAppointment::new(doctor.doctor_id, patient.account_id)
        });

        match self.store.create(&appointment).await {
            Ok(()) => {
                tracing::info!(
                    appointment_id = %appointment.appointment_id,
                    transaction_id = %params.transaction_id,
                    "Appointment recorded for payment"
                );
                Some(appointment.appointment_id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to record appointment for payment");
                None
            }
        }
    }

    /// Logged, never fatal
    async fn notify(&self, params: &Params, doctor: &DoctorContact) {
        let messages = [
            MailMessage::new(
                &doctor.email,
                "New FoodMed appointment",
                format!(
                    "Hello {},\n\nA patient ({}) has paid for a consultation with you.\n\
                     Transaction reference: {}\n\nFoodMed",
                    doctor.name, params.patient_email, params.transaction_id
                ),
            ),
            MailMessage::new(
                &params.patient_email,
                "Your FoodMed appointment is confirmed",
                format!(
                    "Your payment was received and your appointment with {} is confirmed.\n\
                     Transaction reference: {}\n\nFoodMed",
                    doctor.name, params.transaction_id
                ),
            ),
        ];

        for message in &messages {
            if let Err(e) = self.mailer.send(message).await {
                tracing::error!(error = %e, to = %message.to, "Failed to send payment notification");
            }
        }
    }
}

fn required(callback: PaymentCallback) -> BookingResult<Params> {
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    match (
        present(callback.transaction_id),
        present(callback.doctor_id),
        present(callback.patient_email),
    ) {
        (Some(transaction_id), Some(doctor_id), Some(patient_email)) => Ok(Params {
            transaction_id: transaction_id.trim().to_string(),
            doctor_id: doctor_id.trim().to_string(),
            patient_email: normalize_email(&patient_email),
        }),
        _ => Err(BookingError::MissingParameters),
    }
}
