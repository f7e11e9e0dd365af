//! Payment service for checkout initialization.
//!
//! The core only initializes a provider transaction and hands the checkout
//! URL back; settlement arrives later through the confirmation callback.
//! The reference passed in must be the purchase UID so provider retries
//! stay idempotent.

use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::PaymentConfig;

/// Errors that can occur during payment initialization.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment service not configured")]
    NotConfigured,

    #[error("Failed to initialize transaction: {0}")]
    InitFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

#[derive(Debug, Deserialize)]
struct InitializeResponse {
    data: InitializeData,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
}

/// Payment service for initializing provider transactions.
#[derive(Clone)]
pub struct PaymentService {
    config: Arc<PaymentConfig>,
    client: reqwest::Client,
}

impl PaymentService {
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }

    /// Initialize a transaction and return the checkout redirect URL.
    pub async fn initialize(
        &self,
        amount_minor_units: i64,
        email: &str,
        reference: &str,
    ) -> Result<String, PaymentError> {
        match self.config.provider.as_str() {
            "console" => {
                info!(
                    amount_minor_units,
                    email, reference, "payment (console provider): fabricating checkout URL"
                );
                Ok(format!("https://checkout.invalid/{}", reference))
            }
            "paystack" => self.initialize_paystack(amount_minor_units, email, reference).await,
            _ => Err(PaymentError::NotConfigured),
        }
    }

    async fn initialize_paystack(
        &self,
        amount_minor_units: i64,
        email: &str,
        reference: &str,
    ) -> Result<String, PaymentError> {
        if self.config.secret_key.is_empty() {
            return Err(PaymentError::NotConfigured);
        }

        let body = serde_json::json!({
            "email": email,
            "amount": amount_minor_units,
            "reference": reference,
            "currency": self.config.currency,
        });

        let response = self
            .client
            .post(format!("{}/transaction/initialize", self.config.api_url))
            .bearer_auth(&self.config.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::InitFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(PaymentError::ProviderError(format!("{}: {}", status, detail)));
        }

        let parsed: InitializeResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::ProviderError(e.to_string()))?;

        Ok(parsed.data.authorization_url)
    }
}
