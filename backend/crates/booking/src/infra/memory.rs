//! In-memory doubles for the booking use cases and router tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use kernel::id::{AccountId, AppointmentId};
use platform::mailer::{MailError, MailMessage, Mailer};

use crate::domain::entities::{
    Appointment, AppointmentPatch, AppointmentView, Contact, DoctorContact, DoctorStats,
    PaymentClaim,
};
use crate::domain::gateway::{
    GatewayError, PaymentGateway, PaymentLink, PaymentRequest, PaymentVerification,
    STATUS_SUCCESSFUL, parse_transaction_id,
};
use crate::domain::repository::{
    AppointmentRepository, DoctorLedger, PatientDirectory, PaymentLedger,
};
use crate::domain::services::stars_for;
use crate::error::{BookingError, BookingResult};

struct Doctor {
    contact: Contact,
    stats: DoctorStats,
}

#[derive(Default)]
struct State {
    doctors: Vec<Doctor>,
    patients: Vec<Contact>,
    appointments: Vec<Appointment>,
    processed: HashSet<String>,
}

impl State {
    fn contact(&self, account_id: &AccountId) -> Option<Contact> {
        self.doctors
            .iter()
            .map(|d| &d.contact)
            .chain(self.patients.iter())
            .find(|c| c.account_id == *account_id)
            .cloned()
    }

    fn view(&self, appointment: &Appointment) -> AppointmentView {
        AppointmentView {
            appointment: appointment.clone(),
            doctor: self.contact(&appointment.doctor_id),
            patient: self.contact(&appointment.patient_id),
        }
    }

    /// Newest first, like the SQL listing
    fn views_where(&self, keep: impl Fn(&Appointment) -> bool) -> Vec<AppointmentView> {
        let mut views: Vec<_> = self
            .appointments
            .iter()
            .filter(|a| keep(a))
            .map(|a| self.view(a))
            .collect();
        views.reverse();
        views
    }
}

/// Appointments, doctor stats, patients and processed payments in one place
#[derive(Clone, Default)]
pub struct MemoryBookingStore {
    state: Arc<Mutex<State>>,
}

impl MemoryBookingStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn seed_doctor(&self, name: &str, email: &str, patients_count: i32) -> AccountId {
        let account_id = AccountId::new();
        self.lock().doctors.push(Doctor {
            contact: Contact {
                account_id,
                name: name.into(),
                email: email.into(),
                phone: "08031111111".into(),
                profile_image: String::new(),
                specialty: Some("Nutrition".into()),
            },
            stats: DoctorStats {
                patients_count,
                stars: stars_for(patients_count),
            },
        });
        account_id
    }

    pub fn seed_patient(&self, name: &str, email: &str) -> AccountId {
        let account_id = AccountId::new();
        self.lock().patients.push(Contact {
            account_id,
            name: name.into(),
            email: email.into(),
            phone: "08030000000".into(),
            profile_image: String::new(),
            specialty: None,
        });
        account_id
    }

    pub fn appointment_count(&self) -> usize {
        self.lock().appointments.len()
    }

    pub fn doctor_stats(&self, doctor_id: &AccountId) -> Option<DoctorStats> {
        self.lock()
            .doctors
            .iter()
            .find(|d| d.contact.account_id == *doctor_id)
            .map(|d| d.stats)
    }
}

impl AppointmentRepository for MemoryBookingStore {
    async fn create(&self, appointment: &Appointment) -> BookingResult<()> {
        let mut state = self.lock();
        let known = |id: &AccountId| state.contact(id).is_some();
        if !known(&appointment.doctor_id) || !known(&appointment.patient_id) {
            return Err(BookingError::InvalidInput(
                "Doctor or patient does not exist".into(),
            ));
        }
        state.appointments.push(appointment.clone());
        Ok(())
    }

    async fn find_view(
        &self,
        appointment_id: &AppointmentId,
    ) -> BookingResult<Option<AppointmentView>> {
        let state = self.lock();
        Ok(state
            .appointments
            .iter()
            .find(|a| a.appointment_id == *appointment_id)
            .map(|a| state.view(a)))
    }

    async fn list_by_doctor(&self, doctor_id: &AccountId) -> BookingResult<Vec<AppointmentView>> {
        Ok(self.lock().views_where(|a| a.doctor_id == *doctor_id))
    }

    async fn list_by_patient(
        &self,
        patient_id: &AccountId,
    ) -> BookingResult<Vec<AppointmentView>> {
        Ok(self.lock().views_where(|a| a.patient_id == *patient_id))
    }

    async fn update(
        &self,
        appointment_id: &AppointmentId,
        patch: &AppointmentPatch,
    ) -> BookingResult<Option<Appointment>> {
        let mut state = self.lock();
        Ok(state
            .appointments
            .iter_mut()
            .find(|a| a.appointment_id == *appointment_id)
            .map(|a| {
                patch.apply(a);
                a.clone()
            }))
    }
}

impl DoctorLedger for MemoryBookingStore {
    async fn find_doctor(&self, doctor_id: &AccountId) -> BookingResult<Option<DoctorContact>> {
        Ok(self
            .lock()
            .doctors
            .iter()
            .find(|d| d.contact.account_id == *doctor_id)
            .map(|d| DoctorContact {
                doctor_id: d.contact.account_id,
                name: d.contact.name.clone(),
                email: d.contact.email.clone(),
            }))
    }

    async fn record_patient(&self, doctor_id: &AccountId) -> BookingResult<Option<DoctorStats>> {
        let mut state = self.lock();
        Ok(state
            .doctors
            .iter_mut()
            .find(|d| d.contact.account_id == *doctor_id)
            .map(|d| {
                let patients_count = d.stats.patients_count + 1;
                d.stats = DoctorStats {
                    patients_count,
                    stars: stars_for(patients_count),
                };
                d.stats
            }))
    }
}

impl PatientDirectory for MemoryBookingStore {
    async fn find_patient_by_email(&self, email: &str) -> BookingResult<Option<Contact>> {
        let state = self.lock();
        Ok(state
            .patients
            .iter()
            .chain(state.doctors.iter().map(|d| &d.contact))
            .find(|c| c.email == email)
            .cloned())
    }
}

impl PaymentLedger for MemoryBookingStore {
    async fn claim_payment(&self, claim: &PaymentClaim) -> BookingResult<bool> {
        Ok(self.lock().processed.insert(claim.transaction_id.clone()))
    }
}

/// Gateway double. Verifies every transaction as `successful` unless told
/// otherwise. Ids are read as numbers, so `"007"` and `"7"` are the same
/// transaction.
#[derive(Clone)]
pub struct StubGateway {
    status: Arc<Mutex<String>>,
    tx_ref: Arc<Mutex<Option<String>>>,
    fail_create: Arc<AtomicBool>,
    fail_verify: Arc<AtomicBool>,
    verify_calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<PaymentRequest>>>,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self {
            status: Arc::new(Mutex::new(STATUS_SUCCESSFUL.to_string())),
            tx_ref: Arc::default(),
            fail_create: Arc::default(),
            fail_verify: Arc::default(),
            verify_calls: Arc::default(),
            last_request: Arc::default(),
        }
    }
}

impl StubGateway {
    pub fn set_status(&self, status: &str) {
        *self.status.lock().unwrap() = status.to_string();
    }

    /// `tx_ref` reported back on verification
    pub fn set_tx_ref(&self, tx_ref: &str) {
        *self.tx_ref.lock().unwrap() = Some(tx_ref.to_string());
    }

    pub fn fail_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub fn fail_verify(&self) {
        self.fail_verify.store(true, Ordering::SeqCst);
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<PaymentRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl PaymentGateway for StubGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentLink, GatewayError> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected {
                status: 401,
                message: "Invalid authorization key".into(),
            });
        }
        Ok(PaymentLink {
            link: format!(
                "https://checkout.flutterwave.com/v3/hosted/pay/{}",
                request.tx_ref
            ),
        })
    }

    async fn verify_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<PaymentVerification, GatewayError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_verify.load(Ordering::SeqCst) {
            return Err(GatewayError::Malformed("missing data.status".into()));
        }
        let id = parse_transaction_id(transaction_id)?;
        Ok(PaymentVerification {
            transaction_id: id.to_string(),
            status: self.status.lock().unwrap().clone(),
            tx_ref: self.tx_ref.lock().unwrap().clone(),
        })
    }
}

/// Keeps every message; `fail_all` makes every send fail
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Rejected {
                status: 503,
                body: "mailbox unavailable".into(),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
