//! # Stripe Payment Intents
//!
//! Implementation of the Stripe PaymentIntents API.
//! The browser confirms the intent with the returned client secret.

use crate::config::StripeConfig;
use async_trait::async_trait;
use cart_core::{PaymentError, PaymentGateway, PaymentIntent, PaymentIntentRequest, PaymentResult};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe PaymentIntents gateway
pub struct StripePaymentIntents {
    config: StripeConfig,
    client: Client,
}

impl StripePaymentIntents {
    /// Create a new gateway client
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build form data for the Stripe API
    fn form_params(request: &PaymentIntentRequest) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), request.amount.to_string()),
            ("currency".to_string(), request.currency.as_str().to_string()),
        ];

        for (i, method) in request.payment_method_types.iter().enumerate() {
            form_params.push((format!("payment_method_types[{}]", i), method.clone()));
        }

        form_params
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentIntents {
    #[instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> PaymentResult<PaymentIntent> {
        if request.amount <= 0 {
            return Err(PaymentError::InvalidAmount {
                message: format!("amount must be positive, got {}", request.amount),
            });
        }

        let form_params = Self::form_params(request);
        debug!("Creating Stripe payment intent: {} params", form_params.len());

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let intent: StripePaymentIntentResponse = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = intent.client_secret.ok_or_else(|| PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("payment intent {} has no client secret", intent.id),
        })?;

        info!(
            "Created Stripe payment intent: id={}, status={}",
            intent.id, intent.status
        );

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
            amount: intent.amount,
            currency: intent.currency,
            status: intent.status,
            created_at: intent.created.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    amount: i64,
    currency: String,
    status: String,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    created: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::Currency;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> StripePaymentIntents {
        let config = StripeConfig::new("sk_test_abc123").with_api_base_url(server.uri());
        StripePaymentIntents::new(config).unwrap()
    }

    #[test]
    fn test_form_params() {
        let request = PaymentIntentRequest::card(10.00, Currency::USD).unwrap();
        let params = StripePaymentIntents::form_params(&request);

        assert!(params.contains(&("amount".to_string(), "1000".to_string())));
        assert!(params.contains(&("currency".to_string(), "usd".to_string())));
        assert!(params.contains(&("payment_method_types[0]".to_string(), "card".to_string())));
        assert_eq!(params.len(), 3);
    }

    #[tokio::test]
    async fn test_create_payment_intent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("authorization", "Bearer sk_test_abc123"))
            .and(body_string_contains("amount=1000"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("payment_method_types%5B0%5D=card"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_123",
                "object": "payment_intent",
                "amount": 1000,
                "currency": "usd",
                "status": "requires_payment_method",
                "client_secret": "pi_123_secret_456",
                "created": 1700000000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let request = PaymentIntentRequest::card(10.00, Currency::USD).unwrap();
        let intent = gateway.create_payment_intent(&request).await.unwrap();

        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.client_secret, "pi_123_secret_456");
        assert_eq!(intent.amount, 1000);
        assert!(intent.created_at.is_some());
    }

    #[tokio::test]
    async fn test_provider_error_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "Amount must be at least $0.50 usd"
                }
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let request = PaymentIntentRequest::card(0.10, Currency::USD).unwrap();
        let err = gateway.create_payment_intent(&request).await.unwrap_err();

        match err {
            PaymentError::ProviderError { provider, message } => {
                assert_eq!(provider, "stripe");
                assert!(message.contains("at least $0.50"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let request = PaymentIntentRequest::card(5.0, Currency::USD).unwrap();
        let err = gateway.create_payment_intent(&request).await.unwrap_err();

        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_missing_client_secret() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_789",
                "amount": 500,
                "currency": "usd",
                "status": "requires_payment_method",
                "client_secret": null
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let request = PaymentIntentRequest::card(5.0, Currency::USD).unwrap();
        let err = gateway.create_payment_intent(&request).await.unwrap_err();

        assert!(matches!(err, PaymentError::ProviderError { .. }));
    }

    #[tokio::test]
    async fn test_network_error() {
        let config = StripeConfig::new("sk_test_abc123").with_api_base_url("http://127.0.0.1:1");
        let gateway = StripePaymentIntents::new(config).unwrap();
        let request = PaymentIntentRequest::card(5.0, Currency::USD).unwrap();

        let err = gateway.create_payment_intent(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::NetworkError(_)));
        assert!(err.is_retryable());
    }
}
