// Payment provider abstraction used by the boost checkout flow

mod stripe;

pub use stripe::StripeClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Payment status the provider reports for a completed checkout
pub const PAYMENT_STATUS_PAID: &str = "paid";

/// Errors raised while talking to the payment provider
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Payment provider is not configured")]
    NotConfigured,

    #[error("Payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payment provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Payment provider response could not be decoded: {0}")]
    Decode(String),
}

/// The fields of a provider checkout session the boost flow consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub payment_status: String,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Hosted payment page, present on freshly created sessions
    #[serde(default)]
    pub url: Option<String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PAYMENT_STATUS_PAID
    }

    /// Non-empty metadata value
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Parameters for a new one-off boost checkout
#[derive(Debug, Clone)]
pub struct NewCheckoutSession {
    pub product_name: String,
    pub amount: i64,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
}

/// Checkout session service of the payment provider
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Retrieves a checkout session by its provider id
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GatewayError>;

    /// Creates a hosted checkout session
    async fn create_session(
        &self,
        request: &NewCheckoutSession,
    ) -> Result<CheckoutSession, GatewayError>;
}
