//! # Error Types
//!
//! Typed error handling for the phone-cart backend.
//! Store operations return `Result<T, CartError>`, gateway operations
//! return `Result<T, PaymentError>`.

use thiserror::Error;

/// Error type for cart store operations
#[derive(Debug, Error)]
pub enum CartError {
    /// Identifier is not in the store's identifier format
    #[error("Invalid item id: {0}")]
    InvalidItemId(String),

    /// No document with this identifier
    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: String },

    /// Document store failure (connection, query, decode)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors (missing URI, bad names)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CartError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartError::InvalidItemId(_) => 400,
            CartError::ItemNotFound { .. } => 404,
            CartError::Storage(_) => 500,
            CartError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for store operations
pub type CartResult<T> = Result<T, CartError>;

/// Error type for payment gateway operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Amount missing, zero, negative or not a number
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::NetworkError(_) | PaymentError::ProviderError { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Provider and network failures surface to cart clients as a plain 500.
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::InvalidAmount { .. } => 400,
            PaymentError::Configuration(_)
            | PaymentError::ProviderError { .. }
            | PaymentError::NetworkError(_)
            | PaymentError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
