//! # Request Handlers
//!
//! Axum request handlers for the cart API.
//! Each handler makes one store or gateway call. Server-side failures are
//! logged here and reported to the client as a generic message.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cart_core::{CartError, CartItem, Currency, Item, ItemId, PaymentError, PaymentIntentRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn, Span};

const INTERNAL_ERROR: &str = "Internal Server Error";
const ITEM_NOT_FOUND: &str = "Item not found";
const INVALID_ITEM_ID: &str = "Invalid item id";
const ITEM_ADDED: &str = "Item added to cart";
const AMOUNT_REQUIRED: &str = "Amount is required";
const AMOUNT_INVALID: &str = "Amount must be a positive number";
const PAYMENT_FAILED: &str = "Failed to create payment intent";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query string for `GET /phone/cart`
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    /// Store-assigned identifier of a single item
    #[serde(default)]
    pub id: Option<String>,
}

/// Response for `POST /phone/cart`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartResponse {
    pub message: String,
    pub item_id: ItemId,
}

/// Request for `POST /create-payment-intent`.
///
/// `amount` is kept untyped so a missing or mistyped amount gets a 400
/// from [`parse_amount`] instead of a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    #[serde(default)]
    pub amount: Option<Value>,
}

/// Response for `POST /create-payment-intent`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: &str) -> HandlerError {
    (status, Json(ErrorResponse::new(message)))
}

fn cart_error_to_response(err: CartError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match &err {
        CartError::InvalidItemId(_) => INVALID_ITEM_ID,
        CartError::ItemNotFound { .. } => ITEM_NOT_FOUND,
        CartError::Storage(_) | CartError::Configuration(_) => INTERNAL_ERROR,
    };

    if status.is_server_error() {
        error!("Cart store error: {}", err);
    }
    error_response(status, message)
}

fn payment_error_to_response(err: PaymentError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match err {
        PaymentError::InvalidAmount { .. } => error_response(status, AMOUNT_INVALID),
        other => {
            error!(
                retryable = other.is_retryable(),
                "Error creating payment intent: {}", other
            );
            error_response(status, PAYMENT_FAILED)
        }
    }
}

/// Body rejections (missing content type, malformed JSON, missing or
/// mistyped fields) keep axum's status but use the `{"message"}` shape.
fn json_rejection_to_response(rejection: JsonRejection) -> HandlerError {
    let message = rejection.body_text();
    warn!("Rejected request body: {}", message);
    error_response(rejection.status(), &message)
}

/// Validate the `amount` field (major currency units).
///
/// Missing, `null`, zero and empty-string amounts are "required" errors;
/// anything else that is not a positive finite number (numeric strings
/// included) is "invalid".
pub fn parse_amount(raw: Option<&Value>) -> Result<f64, &'static str> {
    let amount = match raw {
        None | Some(Value::Null) => return Err(AMOUNT_REQUIRED),
        Some(Value::Number(n)) => n.as_f64().ok_or(AMOUNT_INVALID)?,
        Some(Value::String(s)) if s.trim().is_empty() => return Err(AMOUNT_REQUIRED),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| AMOUNT_INVALID)?,
        Some(_) => return Err(AMOUNT_INVALID),
    };

    if amount == 0.0 {
        return Err(AMOUNT_REQUIRED);
    }
    if !amount.is_finite() || amount < 0.0 {
        return Err(AMOUNT_INVALID);
    }
    Ok(amount)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "phone-cart",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.store.backend_name(),
        "payments": state.payments.provider_name(),
    }))
}

/// List every item in the collection
#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<CartItem>>, HandlerError> {
    let items = state
        .store
        .list_items()
        .await
        .map_err(cart_error_to_response)?;

    Ok(Json(items))
}

/// Fetch one cart item by `?id=`, or all items when no id is given
#[instrument(skip(state, query), fields(id = ?query.id))]
pub async fn get_cart(
    State(state): State<AppState>,
    Query(query): Query<CartQuery>,
) -> Result<Response, HandlerError> {
    let requested = query
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let Some(raw_id) = requested else {
        let items = state
            .store
            .list_items()
            .await
            .map_err(cart_error_to_response)?;
        return Ok(Json(items).into_response());
    };

    let item_id = ItemId::parse(raw_id).map_err(cart_error_to_response)?;

    let item = state
        .store
        .find_item(&item_id)
        .await
        .map_err(cart_error_to_response)?
        .ok_or_else(|| {
            cart_error_to_response(CartError::ItemNotFound {
                item_id: item_id.to_string(),
            })
        })?;

    Ok(Json(item).into_response())
}

/// Add an item to the cart
#[instrument(skip(state, payload), fields(name, quantity))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    payload: Result<Json<Item>, JsonRejection>,
) -> Result<(StatusCode, Json<AddToCartResponse>), HandlerError> {
    let Json(item) = payload.map_err(json_rejection_to_response)?;

    let span = Span::current();
    span.record("name", item.name.as_str());
    span.record("quantity", item.quantity);

    let item_id = state
        .store
        .insert_item(item)
        .await
        .map_err(cart_error_to_response)?;

    info!("Added item to cart: {}", item_id);

    Ok((
        StatusCode::CREATED,
        Json(AddToCartResponse {
            message: ITEM_ADDED.to_string(),
            item_id,
        }),
    ))
}

/// Create a card payment intent for `amount` dollars
#[instrument(skip(state, payload))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentIntentResponse>, HandlerError> {
    let Json(request) = payload.map_err(json_rejection_to_response)?;

    let amount = parse_amount(request.amount.as_ref())
        .map_err(|message| error_response(StatusCode::BAD_REQUEST, message))?;

    let intent_request =
        PaymentIntentRequest::card(amount, Currency::USD).map_err(payment_error_to_response)?;

    let intent = state
        .payments
        .create_payment_intent(&intent_request)
        .await
        .map_err(payment_error_to_response)?;

    info!(
        "Created payment intent {} for {} {}",
        intent.id, intent.amount, intent.currency
    );

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}
