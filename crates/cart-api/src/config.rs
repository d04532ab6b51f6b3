//! # Application Configuration
//!
//! Settings come from three layers, later ones winning:
//! built-in defaults, an optional `cart.toml` file, and environment
//! variables (a `.env` file is loaded first if present).

use anyhow::Context;
use cart_mongo::StoreSettings;
use serde::Deserialize;
use std::net::SocketAddr;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ENVIRONMENT: &str = "development";

/// Locations searched for the config file when `CART_CONFIG` is unset
const CONFIG_PATHS: [&str; 3] = [
    "config/cart.toml",
    "../config/cart.toml",
    "../../config/cart.toml",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Document store connection
    pub store: StoreSettings,
}

/// Optional `cart.toml` contents
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub store: StoreSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub environment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub uri: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
}

impl FileConfig {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("invalid config file")
    }
}

impl AppConfig {
    /// Load `.env`, the config file (if any) and the process environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let file = match read_config_file()? {
            Some((path, content)) => {
                let file = FileConfig::parse(&content)
                    .with_context(|| format!("failed to parse {}", path))?;
                tracing::info!("Loaded configuration from {}", path);
                file
            }
            None => FileConfig::default(),
        };

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file settings with an environment lookup.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let host = env("HOST")
            .or(file.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match env("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => file.server.port.unwrap_or(DEFAULT_PORT),
        };

        let environment = env("ENVIRONMENT")
            .or(file.server.environment)
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let uri = env("MONGODB_URI")
            .or(file.store.uri)
            .context("MONGODB_URI environment variable is required")?;

        let mut store = StoreSettings::new(uri);
        if let Some(database) = env("MONGODB_DATABASE").or(file.store.database) {
            store = store.with_database(database);
        }
        if let Some(collection) = env("MONGODB_COLLECTION").or(file.store.collection) {
            store = store.with_collection(collection);
        }

        Ok(Self {
            host,
            port,
            environment,
            store,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn log_startup(&self) {
        tracing::info!("Environment: {}", self.environment);
        tracing::info!("MongoDB: {}", self.store.redacted_uri());
        tracing::info!(
            "Collection: {}.{}",
            self.store.database,
            self.store.collection
        );
    }
}

fn read_config_file() -> anyhow::Result<Option<(String, String)>> {
    if let Ok(path) = std::env::var("CART_CONFIG") {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read CART_CONFIG file {}", path))?;
        return Ok(Some((path, content)));
    }

    for path in CONFIG_PATHS {
        if let Ok(content) = std::fs::read_to_string(path) {
            return Ok(Some((path.to_string(), content)));
        }
    }

    Ok(None)
}
