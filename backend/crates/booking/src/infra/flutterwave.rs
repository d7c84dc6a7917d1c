//! Flutterwave Payment Gateway
//!
//! Hosted checkout through `POST /v3/payments` and verification through
//! `GET /v3/transactions/{id}/verify`, both with the secret key as bearer
//! token.

use serde::{Deserialize, Serialize};

use crate::domain::gateway::{
    GatewayError, PaymentGateway, PaymentLink, PaymentRequest, PaymentVerification,
    parse_transaction_id,
};

#[derive(Debug, Clone)]
pub struct FlutterwaveConfig {
    pub base_url: String,
    /// `None` disables the gateway; every call fails with `NotConfigured`
    pub secret_key: Option<String>,
}

impl Default for FlutterwaveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.flutterwave.com".to_string(),
            secret_key: None,
        }
    }
}

impl FlutterwaveConfig {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Serialize)]
struct CreatePaymentBody<'a> {
    tx_ref: &'a str,
    amount: u64,
    currency: &'a str,
    redirect_url: &'a str,
    customer: Customer<'a>,
    customizations: Customizations<'a>,
}

#[derive(Serialize)]
struct Customer<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct Customizations<'a> {
    title: &'a str,
}

impl<'a> From<&'a PaymentRequest> for CreatePaymentBody<'a> {
    fn from(request: &'a PaymentRequest) -> Self {
        Self {
            tx_ref: &request.tx_ref,
            amount: request.amount,
            currency: &request.currency,
            redirect_url: &request.redirect_url,
            customer: Customer {
                email: &request.customer_email,
                name: &request.customer_name,
            },
            customizations: Customizations {
                title: &request.title,
            },
        }
    }
}

/// `{status, message, data}` envelope shared by both endpoints
#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Deserialize)]
struct HostedLink {
    link: String,
}

#[derive(Deserialize)]
struct Transaction {
    id: u64,
    status: String,
    tx_ref: Option<String>,
}

#[derive(Clone)]
pub struct FlutterwaveGateway {
    client: reqwest::Client,
    config: FlutterwaveConfig,
}

impl FlutterwaveGateway {
    pub fn new(client: reqwest::Client, config: FlutterwaveConfig) -> Self {
        Self { client, config }
    }

    fn secret_key(&self) -> Result<&str, GatewayError> {
        self.config
            .secret_key
            .as_deref()
            .ok_or(GatewayError::NotConfigured)
    }
}

/// Turn a response into its `data` payload, or the gateway's own message
async fn read_data<T>(response: reqwest::Response) -> Result<T, GatewayError>
where
    T: for<'de> Deserialize<'de>,
{
    let status = response.status();
    let envelope: Envelope<T> = response.json().await?;

    if !status.is_success() {
        return Err(GatewayError::Rejected {
            status: status.as_u16(),
            message: envelope.message,
        });
    }

    envelope
        .data
        .ok_or_else(|| GatewayError::Malformed("missing data".to_string()))
}

impl PaymentGateway for FlutterwaveGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentLink, GatewayError> {
        let key = self.secret_key()?;

        let response = self
            .client
            .post(self.config.url("/v3/payments"))
            .bearer_auth(key)
            .json(&CreatePaymentBody::from(request))
            .send()
            .await?;

        let hosted: HostedLink = read_data(response).await?;
        tracing::debug!(tx_ref = %request.tx_ref, "Hosted payment created");

        Ok(PaymentLink { link: hosted.link })
    }

    async fn verify_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<PaymentVerification, GatewayError> {
        let key = self.secret_key()?;
        let id = parse_transaction_id(transaction_id)?;

        let response = self
            .client
            .get(self.config.url(&format!("/v3/transactions/{id}/verify")))
            .bearer_auth(key)
            .send()
            .await?;

        let transaction: Transaction = read_data(response).await?;
        if transaction.id != id {
            return Err(GatewayError::Malformed(format!(
                "asked for transaction {id}, got {}",
                transaction.id
            )));
        }

        tracing::debug!(
            transaction_id = id,
            status = %transaction.status,
            "Transaction verified"
        );

        Ok(PaymentVerification {
            transaction_id: transaction.id.to_string(),
            status: transaction.status,
            tx_ref: transaction.tx_ref,
        })
    }
}
