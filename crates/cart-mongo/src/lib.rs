//! # cart-mongo
//!
//! MongoDB implementation of `cart_core::CartStore`.
//!
//! ```rust,ignore
//! use cart_mongo::{MongoCartStore, StoreSettings};
//!
//! let settings = StoreSettings::new(std::env::var("MONGODB_URI")?);
//! let store = MongoCartStore::connect(&settings).await?;
//! let items = store.list_items().await?;
//! ```

pub mod settings;
pub mod store;

pub use settings::{StoreSettings, DEFAULT_COLLECTION, DEFAULT_DATABASE};
pub use store::MongoCartStore;
