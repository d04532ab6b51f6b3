//! # Store Settings
//!
//! Connection settings for the MongoDB cart store.

/// Database used when none is configured
pub const DEFAULT_DATABASE: &str = "phones";

/// Collection used when none is configured
pub const DEFAULT_COLLECTION: &str = "phonesCollection";

/// MongoDB connection settings
#[derive(Clone)]
pub struct StoreSettings {
    /// Connection URI (mongodb:// or mongodb+srv://)
    pub uri: String,
    /// Database name
    pub database: String,
    /// Collection holding cart items
    pub collection: String,
}

impl StoreSettings {
    /// Settings for `uri` with the default database and collection
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Builder: set the database name
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Builder: set the collection name
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// The URI with any password replaced, safe for logs
    pub fn redacted_uri(&self) -> String {
        redact_uri(&self.uri)
    }
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSettings")
            .field("uri", &self.redacted_uri())
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

fn redact_uri(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &uri[authority_start..];
    let authority_end = rest.find('/').unwrap_or(rest.len());

    // Credentials end at the last '@' of the authority
    let Some(at) = rest[..authority_end].rfind('@') else {
        return uri.to_string();
    };
    let credentials = &rest[..at];
    let user = credentials.split(':').next().unwrap_or_default();

    format!(
        "{}{}:****@{}",
        &uri[..authority_start],
        user,
        &rest[at + 1..]
    )
}
