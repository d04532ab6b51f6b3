//! # Cart Store Trait
//!
//! Storage seam for cart items. Every route goes through one shared
//! `CartStore` handle constructed at startup.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │           CartStore (trait)              │
//! │  ├── list_items()                        │
//! │  ├── find_item()                         │
//! │  └── insert_item()                       │
//! └──────────────────────────────────────────┘
//!                     ▲
//!          ┌──────────┴──────────┐
//!  ┌───────┴───────┐     ┌───────┴───────┐
//!  │MongoCartStore │     │MemoryCartStore│
//!  │ (cart-mongo)  │     │  (in-process) │
//!  └───────────────┘     └───────────────┘
//! ```

use crate::error::{CartError, CartResult};
use crate::item::{CartItem, Item, ItemId};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Document store holding cart items
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetch every item in the collection.
    async fn list_items(&self) -> CartResult<Vec<CartItem>>;

    /// Look up one item by its store-assigned identifier.
    async fn find_item(&self, id: &ItemId) -> CartResult<Option<CartItem>>;

    /// Insert a new item and return the identifier the store assigned.
    async fn insert_item(&self, item: Item) -> CartResult<ItemId>;

    /// Backend name (for logging and health output).
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared cart store (dynamic dispatch)
pub type BoxedCartStore = Arc<dyn CartStore>;

/// In-process store. Identifiers follow the ObjectId layout: a 4-byte
/// timestamp followed by an 8-byte counter.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    items: RwLock<Vec<CartItem>>,
    counter: AtomicU64,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> CartResult<ItemId> {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let secs = u32::try_from(Utc::now().timestamp()).map_err(|_| {
            CartError::Storage("system clock outside the ObjectId timestamp range".to_string())
        })?;
        ItemId::parse(&format!("{:08x}{:016x}", secs, seq))
    }

    fn poisoned() -> CartError {
        CartError::Storage("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn list_items(&self) -> CartResult<Vec<CartItem>> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.clone())
    }

    async fn find_item(&self, id: &ItemId) -> CartResult<Option<CartItem>> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.iter().find(|stored| &stored.item_id == id).cloned())
    }

    async fn insert_item(&self, item: Item) -> CartResult<ItemId> {
        let item_id = self.next_id()?;
        let stored = CartItem::from_item(item_id.clone(), &item)?;
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        items.push(stored);
        Ok(item_id)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
