//! # MongoDB Cart Store
//!
//! One client, one database, one collection. The handle is created once at
//! startup and shared by every route.

use crate::settings::StoreSettings;
use async_trait::async_trait;
use cart_core::{CartError, CartItem, CartResult, CartStore, Item, ItemId};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document, Bson, Document};
use mongodb::{Client, Collection};
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Encode a new item. `_id` is left for the server to assign.
fn item_to_document(item: &Item) -> CartResult<Document> {
    to_document(item).map_err(|e| CartError::Storage(format!("failed to encode item: {}", e)))
}

/// Convert a stored document into a [`CartItem`], keeping every field.
///
/// Only `_id` is interpreted; it must be an ObjectId. The remaining fields
/// are rendered as relaxed extended JSON.
fn document_to_cart_item(mut document: Document) -> CartResult<CartItem> {
    let object_id = match document.remove("_id") {
        Some(Bson::ObjectId(object_id)) => object_id,
        Some(other) => {
            return Err(CartError::Storage(format!(
                "document _id is {:?}, expected ObjectId",
                other.element_type()
            )))
        }
        None => return Err(CartError::Storage("document without _id".to_string())),
    };

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(fields) => Ok(CartItem::new(ItemId::parse(&object_id.to_hex())?, fields)),
        other => Err(CartError::Storage(format!(
            "document rendered as non-object: {}",
            other
        ))),
    }
}

fn to_object_id(id: &ItemId) -> CartResult<ObjectId> {
    ObjectId::parse_str(id.as_str()).map_err(|_| CartError::InvalidItemId(id.to_string()))
}

fn storage_error(operation: &str, err: mongodb::error::Error) -> CartError {
    CartError::Storage(format!("{} failed: {}", operation, err))
}

/// Cart store backed by a MongoDB collection
#[derive(Clone)]
pub struct MongoCartStore {
    collection: Collection<Document>,
}

impl MongoCartStore {
    /// Connect, verify the server answers a `ping`, and open the collection.
    #[instrument(skip(settings), fields(database = %settings.database, collection = %settings.collection))]
    pub async fn connect(settings: &StoreSettings) -> CartResult<Self> {
        info!("Connecting to MongoDB at {}", settings.redacted_uri());

        let client = Client::with_uri_str(&settings.uri).await.map_err(|e| {
            CartError::Configuration(format!("invalid MongoDB URI: {}", e))
        })?;

        let database = client.database(&settings.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| storage_error("ping", e))?;

        info!("Connected to MongoDB");

        Ok(Self {
            collection: database.collection(&settings.collection),
        })
    }
}

#[async_trait]
impl CartStore for MongoCartStore {
    async fn list_items(&self) -> CartResult<Vec<CartItem>> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| storage_error("find", e))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| storage_error("find", e))?;

        debug!("Fetched {} documents", documents.len());
        documents.into_iter().map(document_to_cart_item).collect()
    }

    async fn find_item(&self, id: &ItemId) -> CartResult<Option<CartItem>> {
        let object_id = to_object_id(id)?;

        self.collection
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| storage_error("find_one", e))?
            .map(document_to_cart_item)
            .transpose()
    }

    async fn insert_item(&self, item: Item) -> CartResult<ItemId> {
        let document = item_to_document(&item)?;

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| storage_error("insert_one", e))?;

        let object_id = result.inserted_id.as_object_id().ok_or_else(|| {
            CartError::Storage(format!(
                "unexpected inserted id type: {}",
                result.inserted_id
            ))
        })?;

        ItemId::parse(&object_id.to_hex())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_document_has_no_object_id() {
        let document =
            item_to_document(&Item::new("Phone A", 2, 199.99).with_external_id("x1")).unwrap();

        assert!(!document.contains_key("_id"));
        assert_eq!(document.get_str("id").unwrap(), "x1");
        assert_eq!(document.get_str("name").unwrap(), "Phone A");
        assert_eq!(document.get_f64("price").unwrap(), 199.99);
    }

    #[test]
    fn test_stored_document_keeps_every_field() {
        let object_id = ObjectId::new();
        let stored = doc! {
            "_id": object_id,
            "id": 7,
            "quantity": 2,
            "name": "Phone A",
            "price": 199.99,
            "color": "black",
            "specs": { "storage": "128GB" },
        };

        let cart_item = document_to_cart_item(stored).unwrap();

        assert_eq!(cart_item.item_id.as_str(), object_id.to_hex());
        assert_eq!(cart_item.get("id"), Some(&json!(7)));
        assert_eq!(cart_item.get("quantity"), Some(&json!(2)));
        assert_eq!(cart_item.get("price"), Some(&json!(199.99)));
        assert_eq!(cart_item.get("color"), Some(&json!("black")));
        assert_eq!(cart_item.get("specs"), Some(&json!({ "storage": "128GB" })));
        assert!(cart_item.get("_id").is_none());
    }

    #[test]
    fn test_document_without_item_fields_is_returned() {
        let stored = doc! {
            "_id": ObjectId::new(),
            "name": "Pixel 8",
            "brand": "Google",
            "price": 300,
        };

        let cart_item = document_to_cart_item(stored).unwrap();

        assert!(cart_item.get("quantity").is_none());
        assert_eq!(cart_item.get("brand"), Some(&json!("Google")));
        assert_eq!(cart_item.get("price"), Some(&json!(300)));
    }

    #[test]
    fn test_document_without_id_is_storage_error() {
        let document = item_to_document(&Item::new("Phone A", 1, 1.0)).unwrap();
        let err = document_to_cart_item(document).unwrap_err();
        assert!(matches!(err, CartError::Storage(_)));
    }

    #[test]
    fn test_non_object_id_is_storage_error() {
        let stored = doc! { "_id": "phone-a", "name": "Phone A" };
        let err = document_to_cart_item(stored).unwrap_err();
        assert!(matches!(err, CartError::Storage(_)));
    }

    #[test]
    fn test_object_id_round_trip() {
        let object_id = ObjectId::new();
        let item_id = ItemId::parse(&object_id.to_hex()).unwrap();
        assert_eq!(to_object_id(&item_id).unwrap(), object_id);
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB (set MONGODB_URI)"]
    async fn test_live_insert_and_find() {
        let uri = std::env::var("MONGODB_URI").unwrap();
        let settings = StoreSettings::new(uri).with_database("phone_cart_test");
        let store = MongoCartStore::connect(&settings).await.unwrap();

        let item = Item::new("Phone A", 2, 199.99).with_external_id("x1");
        let id = store.insert_item(item).await.unwrap();

        let found = store.find_item(&id).await.unwrap().unwrap();
        assert_eq!(found.get("name"), Some(&json!("Phone A")));
        assert_eq!(found.get("id"), Some(&json!("x1")));
        assert!(store
            .list_items()
            .await
            .unwrap()
            .iter()
            .any(|stored| stored.item_id == id));
    }
}
