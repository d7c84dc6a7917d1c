//! Payment Gateway
//!
//! The booking side only needs two calls from a gateway: create a hosted
//! payment and verify a completed transaction.

use thiserror::Error;

/// Status string the gateway reports for a settled payment
pub const STATUS_SUCCESSFUL: &str = "successful";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub tx_ref: String,
    /// Whole currency units
    pub amount: u64,
    pub currency: String,
    /// Where the gateway sends the customer afterwards
    pub redirect_url: String,
    pub customer_email: String,
    pub customer_name: String,
    pub title: String,
}

/// Hosted checkout page for a created payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLink {
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentVerification {
    /// Id as reported back by the gateway, not as received from the caller
    pub transaction_id: String,
    pub status: String,
    pub tx_ref: Option<String>,
}

impl PaymentVerification {
    pub fn is_successful(&self) -> bool {
        self.status == STATUS_SUCCESSFUL
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Payment gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Payment gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Payment gateway response was malformed: {0}")]
    Malformed(String),

    #[error("Payment gateway is not configured")]
    NotConfigured,

    #[error("Invalid transaction id: {0:?}")]
    InvalidTransactionId(String),
}

/// Gateway transaction ids are plain decimal numbers. Anything else is
/// refused before it reaches a request URL.
pub fn parse_transaction_id(raw: &str) -> Result<u64, GatewayError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GatewayError::InvalidTransactionId(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| GatewayError::InvalidTransactionId(raw.to_string()))
}

#[trait_variant::make(PaymentGateway: Send)]
pub trait LocalPaymentGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentLink, GatewayError>;

    async fn verify_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<PaymentVerification, GatewayError>;
}
