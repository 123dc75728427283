use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

use super::{CheckoutGateway, CheckoutSession, GatewayError, NewCheckoutSession};
use crate::config::ApiConfig;

/// Client for the Stripe checkout sessions API
pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    /// Create a new Stripe client, or `NotConfigured` when no secret key is set
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
        let secret_key = config
            .stripe_secret_key
            .clone()
            .ok_or(GatewayError::NotConfigured)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(StripeClient {
            client,
            api_base: config.stripe_api_base.trim_end_matches('/').to_string(),
            secret_key,
        })
    }

    async fn decode(response: reqwest::Response) -> Result<CheckoutSession, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CheckoutGateway for StripeClient {
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, GatewayError> {
        // The id comes from the browser; keep it a single path segment
        let mut url = Url::parse(&format!("{}/v1/checkout/sessions", self.api_base))
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::Decode("API base cannot carry a path".to_string()))?
            .push(session_id);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_session(
        &self,
        request: &NewCheckoutSession,
    ) -> Result<CheckoutSession, GatewayError> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);
        let form = checkout_form(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .header("Idempotency-Key", uuid::Uuid::new_v4().to_string())
            .form(&form)
            .send()
            .await?;
        Self::decode(response).await
    }
}

/// Form-encoded body of a one-line-item payment checkout
fn checkout_form(request: &NewCheckoutSession) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            request.amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            request.product_name.clone(),
        ),
    ];
    for (key, value) in &request.metadata {
        form.push((format!("metadata[{}]", key), value.clone()));
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_secret_key() {
        let config = ApiConfig::default();
        assert!(matches!(
            StripeClient::new(&config),
            Err(GatewayError::NotConfigured)
        ));
    }

    #[test]
    fn test_checkout_form_carries_metadata() {
        let request = NewCheckoutSession {
            product_name: "Premium boost".to_string(),
            amount: 1500,
            currency: "chf".to_string(),
            success_url: "https://viao.ch/api/stripe/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "https://viao.ch/events".to_string(),
            metadata: vec![
                ("eventId".to_string(), "evt_1".to_string()),
                ("level".to_string(), "2".to_string()),
            ],
        };

        let form = checkout_form(&request);
        assert!(form.contains(&("mode".to_string(), "payment".to_string())));
        assert!(form.contains(&(
            "line_items[0][price_data][unit_amount]".to_string(),
            "1500".to_string()
        )));
        assert!(form.contains(&("metadata[eventId]".to_string(), "evt_1".to_string())));
        assert!(form.contains(&("metadata[level]".to_string(), "2".to_string())));
    }
}
