//! Initiate Payment Use Case
//!
//! Creates a hosted payment with the gateway. The gateway later redirects
//! the customer to `/payment-success`, which runs reconciliation.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::application::config::BookingConfig;
use crate::domain::gateway::{PaymentGateway, PaymentRequest};
use crate::domain::repository::DoctorLedger;
use crate::domain::value_objects::{TransactionRef, normalize_email};
use crate::error::{BookingError, BookingResult};

#[derive(Debug, Clone, Default)]
pub struct InitiatePaymentInput {
    pub doctor_id: String,
    pub patient_email: String,
    pub patient_name: Option<String>,
    /// Falls back to the configured consultation fee
    pub amount: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct InitiatePaymentOutput {
    pub payment_link: String,
    pub tx_ref: String,
}

pub struct InitiatePaymentUseCase<D, G>
where
    D: DoctorLedger,
    G: PaymentGateway,
{
    doctors: Arc<D>,
    gateway: Arc<G>,
    config: Arc<BookingConfig>,
}

impl<D, G> InitiatePaymentUseCase<D, G>
where
    D: DoctorLedger,
    G: PaymentGateway,
{
    pub fn new(doctors: Arc<D>, gateway: Arc<G>, config: Arc<BookingConfig>) -> Self {
        Self {
            doctors,
            gateway,
            config,
        }
    }

    pub async fn execute(&self, input: InitiatePaymentInput) -> BookingResult<InitiatePaymentOutput> {
        let patient_email = normalize_email(&input.patient_email);
        if patient_email.is_empty() {
            return Err(BookingError::InvalidInput("patientEmail is required".to_string()));
        }

        let doctor_id: AccountId = input
            .doctor_id
            .parse()
            .map_err(|_| BookingError::DoctorNotFound)?;
        let doctor = self
            .doctors
            .find_doctor(&doctor_id)
            .await?
            .ok_or(BookingError::DoctorNotFound)?;

        let amount = input.amount.unwrap_or(self.config.consultation_fee);
        if amount == 0 {
            return Err(BookingError::InvalidInput("amount must be positive".to_string()));
        }

        let tx_ref = TransactionRef::generate();
        let request = PaymentRequest {
            tx_ref: tx_ref.to_string(),
            amount,
            currency: self.config.currency.clone(),
            redirect_url: self
                .config
                .callback_url(&doctor.doctor_id.to_string(), &patient_email),
            customer_name: input
                .patient_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| patient_email.clone()),
            customer_email: patient_email,
            title: format!("{} with {}", self.config.payment_title, doctor.name),
        };

        let link = self.gateway.create_payment(&request).await?;

        tracing::info!(
            tx_ref = %tx_ref,
            doctor_id = %doctor.doctor_id,
            amount = amount,
            "Payment initiated"
        );

        Ok(InitiatePaymentOutput {
            payment_link: link.link,
            tx_ref: tx_ref.into_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{MemoryBookingStore, StubGateway};

    fn use_case(
        store: &MemoryBookingStore,
        gateway: &StubGateway,
    ) -> InitiatePaymentUseCase<MemoryBookingStore, StubGateway> {
        InitiatePaymentUseCase::new(
            Arc::new(store.clone()),
            Arc::new(gateway.clone()),
            Arc::new(BookingConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_initiate_builds_callback_url() {
        let store = MemoryBookingStore::default();
        let doctor_id = store.seed_doctor("Dr Bello", "dr.bello@example.com", 0);
        let gateway = StubGateway::default();

        let output = use_case(&store, &gateway)
            .execute(InitiatePaymentInput {
                doctor_id: doctor_id.to_string(),
                patient_email: " Ada@Example.com ".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(output.tx_ref.starts_with("foodmed-"));
        assert!(output.payment_link.contains(&output.tx_ref));

        let request = gateway.last_request().unwrap();
        assert_eq!(request.amount, 5_000);
        assert_eq!(request.currency, "NGN");
        assert_eq!(request.customer_email, "ada@example.com");
        assert_eq!(
            request.redirect_url,
            format!(
                "https://api.foodmed.app/payment-success?doctorId={doctor_id}&patientEmail=ada%40example.com"
            )
        );
    }

    #[tokio::test]
    async fn test_initiate_failures() {
        let store = MemoryBookingStore::default();
        let doctor_id = store.seed_doctor("Dr Bello", "dr.bello@example.com", 0);
        let gateway = StubGateway::default();
        let use_case = use_case(&store, &gateway);

        let err = use_case
            .execute(InitiatePaymentInput {
                doctor_id: AccountId::new().to_string(),
                patient_email: "ada@example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::DoctorNotFound));

        gateway.fail_create();
        let err = use_case
            .execute(InitiatePaymentInput {
                doctor_id: doctor_id.to_string(),
                patient_email: "ada@example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Gateway(_)));
        assert_eq!(err.status_code().as_u16(), 500);
    }
}
