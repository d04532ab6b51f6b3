//! # Item Types
//!
//! Cart item records for phone-cart.
//! An `Item` is what clients send; a `CartItem` is a stored document as the
//! store returns it.

use crate::error::{CartError, CartResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A phone listing / cart entry as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// External identifier supplied by the frontend (optional)
    #[serde(
        default,
        deserialize_with = "deserialize_external_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    /// Quantity
    pub quantity: u32,

    /// Display name
    pub name: String,

    /// Unit price in major currency units
    pub price: f64,
}

impl Item {
    /// Create a new item without an external identifier
    pub fn new(name: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            id: None,
            quantity,
            name: name.into(),
            price,
        }
    }

    /// Builder: set the external identifier
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Frontends send the external id as either a string or a number; numbers
/// are kept as their decimal string form.
fn deserialize_external_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    }))
}

/// Store-assigned identifier (ObjectId hex form, lowercase)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Number of hex characters in an identifier
    pub const LENGTH: usize = 24;

    /// Parse an identifier, rejecting anything that is not 24 hex digits
    pub fn parse(raw: &str) -> CartResult<Self> {
        let trimmed = raw.trim();
        if trimmed.len() != Self::LENGTH || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CartError::InvalidItemId(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = CartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// A stored document together with its store-assigned identifier.
///
/// `fields` holds every field of the document except `_id`, exactly as
/// stored. Documents are not required to match [`Item`]; anything inserted
/// by other writers comes back intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub item_id: ItemId,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CartItem {
    pub fn new(item_id: ItemId, fields: Map<String, Value>) -> Self {
        Self { item_id, fields }
    }

    /// Document for a newly inserted item
    pub fn from_item(item_id: ItemId, item: &Item) -> CartResult<Self> {
        match serde_json::to_value(item) {
            Ok(Value::Object(fields)) => Ok(Self::new(item_id, fields)),
            Ok(other) => Err(CartError::Storage(format!(
                "item serialized to non-object: {}",
                other
            ))),
            Err(e) => Err(CartError::Storage(format!("failed to encode item: {}", e))),
        }
    }

    /// Look up a single field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_id() {
        let id = ItemId::parse("65A1F0C2B3D4E5F60718293A").unwrap();
        assert_eq!(id.as_str(), "65a1f0c2b3d4e5f60718293a");

        assert!(ItemId::parse("not-an-id").is_err());
        assert!(ItemId::parse("65a1f0c2b3d4e5f60718293").is_err());
        assert!(ItemId::parse("65a1f0c2b3d4e5f60718293g").is_err());
    }

    #[test]
    fn test_item_accepts_numeric_external_id() {
        let item: Item = serde_json::from_str(
            r#"{"id": 42, "quantity": 1, "name": "Phone B", "price": 99}"#,
        )
        .unwrap();

        assert_eq!(item.id.as_deref(), Some("42"));
        assert_eq!(item.price, 99.0);
    }

    #[test]
    fn test_item_drops_unknown_fields() {
        let item: Item = serde_json::from_str(
            r#"{"id": "x1", "quantity": 2, "name": "Phone A", "price": 199.99, "color": "red"}"#,
        )
        .unwrap();

        assert_eq!(
            item,
            Item::new("Phone A", 2, 199.99).with_external_id("x1")
        );
    }

    #[test]
    fn test_item_requires_typed_fields() {
        let result = serde_json::from_str::<Item>(
            r#"{"quantity": "two", "name": "Phone A", "price": 199.99}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cart_item_json_shape() {
        let cart_item = CartItem::from_item(
            ItemId::parse("65a1f0c2b3d4e5f60718293a").unwrap(),
            &Item::new("Phone A", 2, 199.99),
        )
        .unwrap();

        let json = serde_json::to_value(&cart_item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_id": "65a1f0c2b3d4e5f60718293a",
                "quantity": 2,
                "name": "Phone A",
                "price": 199.99
            })
        );
    }

    #[test]
    fn test_cart_item_keeps_arbitrary_fields() {
        let json = serde_json::json!({
            "_id": "65a1f0c2b3d4e5f60718293a",
            "name": "Pixel 8",
            "price": 699.0,
            "brand": "Google",
            "specs": {"ram": "8GB"}
        });

        let cart_item: CartItem = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(cart_item.get("brand"), Some(&serde_json::json!("Google")));
        assert!(cart_item.get("quantity").is_none());
        assert!(cart_item.get("_id").is_none());
        assert_eq!(serde_json::to_value(&cart_item).unwrap(), json);
    }
}
