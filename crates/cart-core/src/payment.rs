//! # Payment Types
//!
//! Currency handling and payment intent types shared by the API layer and
//! gateway implementations.

use crate::error::{PaymentError, PaymentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Checkout currency (ISO 4217). The storefront charges in dollars only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    USD,
}

impl Currency {
    /// Returns the lowercase ISO 4217 code, as payment providers expect it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }

    /// Convert a major-unit amount (dollars) to minor units (cents), rounding
    /// to the nearest unit.
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        match self {
            Currency::USD => (amount * 100.0).round() as i64,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Request to create a payment intent, amount already in minor units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    /// Amount in smallest currency unit
    pub amount: i64,

    pub currency: Currency,

    /// Allowed payment method types (e.g. "card")
    pub payment_method_types: Vec<String>,
}

impl PaymentIntentRequest {
    /// Card-only intent for a major-unit amount.
    ///
    /// Rejects amounts that are not finite, not positive, or that round to
    /// zero minor units.
    pub fn card(amount: f64, currency: Currency) -> PaymentResult<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PaymentError::InvalidAmount {
                message: format!("amount must be a positive number, got {}", amount),
            });
        }

        let minor_units = currency.to_smallest_unit(amount);
        if minor_units <= 0 {
            return Err(PaymentError::InvalidAmount {
                message: format!("amount {} rounds to zero {}", amount, currency),
            });
        }

        Ok(Self {
            amount: minor_units,
            currency,
            payment_method_types: vec!["card".to_string()],
        })
    }
}

/// A payment intent as created by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider intent ID (pi_...)
    pub id: String,

    /// Secret the browser uses to confirm the payment
    pub client_secret: String,

    /// Amount in smallest currency unit
    pub amount: i64,

    /// Currency code as reported by the provider
    pub currency: String,

    /// Provider status (e.g. "requires_payment_method")
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smallest_unit_rounding() {
        assert_eq!(Currency::USD.to_smallest_unit(10.00), 1000);
        assert_eq!(Currency::USD.to_smallest_unit(199.99), 19999);
        assert_eq!(Currency::USD.to_smallest_unit(0.015), 2);
        assert_eq!(Currency::USD.to_smallest_unit(500.0), 50000);
    }

    #[test]
    fn test_card_request() {
        let request = PaymentIntentRequest::card(10.00, Currency::USD).unwrap();
        assert_eq!(request.amount, 1000);
        assert_eq!(request.currency.as_str(), "usd");
        assert_eq!(request.currency.to_string(), "USD");
        assert_eq!(request.payment_method_types, vec!["card".to_string()]);
    }

    #[test]
    fn test_card_request_rejects_non_positive() {
        assert!(PaymentIntentRequest::card(0.0, Currency::USD).is_err());
        assert!(PaymentIntentRequest::card(-5.0, Currency::USD).is_err());
        assert!(PaymentIntentRequest::card(f64::NAN, Currency::USD).is_err());
        assert!(PaymentIntentRequest::card(0.004, Currency::USD).is_err());
    }
}
