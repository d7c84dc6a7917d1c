//! Application Configuration
//!
//! Configuration for the booking application layer.

use reqwest::Url;

/// Booking application configuration
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Web frontend origin, e.g. `https://foodmed.app`
    pub frontend_url: String,
    /// Frontend page shown after a confirmed payment
    pub success_page: String,
    /// Frontend page shown when reconciliation fails
    pub failure_page: String,
    /// Public origin of this API, used for the gateway redirect URL
    pub public_base_url: String,
    pub currency: String,
    /// Consultation fee in whole currency units
    pub consultation_fee: u64,
    pub payment_title: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            frontend_url: "https://foodmed.app".to_string(),
            success_page: "/payment-success.html".to_string(),
            failure_page: "/payment-failed.html".to_string(),
            public_base_url: "https://api.foodmed.app".to_string(),
            currency: "NGN".to_string(),
            consultation_fee: 5_000,
            payment_title: "FoodMed consultation".to_string(),
        }
    }
}

impl BookingConfig {
    /// Local frontend and API on their default dev ports
    pub fn development() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            public_base_url: "http://localhost:5223".to_string(),
            ..Default::default()
        }
    }

    /// Gateway redirect target: our callback with the booking context
    pub fn callback_url(&self, doctor_id: &str, patient_email: &str) -> String {
        build_url(
            &self.public_base_url,
            "/payment-success",
            &[("doctorId", doctor_id), ("patientEmail", patient_email)],
        )
    }

    pub fn success_url(&self, transaction_id: &str) -> String {
        build_url(
            &self.frontend_url,
            &self.success_page,
            &[("status", "successful"), ("transactionId", transaction_id)],
        )
    }

    pub fn failure_url(&self, doctor_id: &str, patient_email: &str, reason: &str) -> String {
        build_url(
            &self.frontend_url,
            &self.failure_page,
            &[
                ("status", "failed"),
                ("reason", reason),
                ("doctorId", doctor_id),
                ("patientEmail", patient_email),
            ],
        )
    }
}

/// `base` + `path` with percent-encoded query parameters
fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> String {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    match Url::parse_with_params(&joined, params) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::error!(error = %e, base = %base, "Invalid redirect base URL");
            joined
        }
    }
}
