//! # Storefront Configuration
//!
//! Where the cart is kept, what the store is called, how loud the logs are.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     STOREFRONT_STORAGE_BACKEND=memory                                   │
//! │     STOREFRONT_DB_PATH=/tmp/shop.db                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/shop/config.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.storefront.shop/config.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     SQLite in the data dir, slot "cart-storage"                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! backend = "sqlite"   # sqlite | memory
//! database_path = "/var/lib/shop/storefront.db"
//! cart_key = "cart-storage"
//!
//! [store]
//! name = "ShopHub"
//! api_url = "https://fakestoreapi.com"
//!
//! [logging]
//! filter = "info,storefront=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{StateError, StateResult};
use crate::persistence::DEFAULT_CART_KEY;

const DATABASE_FILE: &str = "storefront.db";

// =============================================================================
// Storage Backend
// =============================================================================

/// Where cart snapshots are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// `storage_slots` table in a local SQLite file.
    #[default]
    Sqlite,

    /// Process memory. The cart is gone on exit.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "db" | "disk" => Ok(StorageBackend::Sqlite),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(StateError::Config(format!(
                "Unknown storage backend: '{}'. Valid options: sqlite, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite file. Defaults to `storefront.db` in the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Slot the cart snapshot is written under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            database_path: None,
            cart_key: default_cart_key(),
        }
    }
}

/// Store identity shown in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Base URL of the product catalog API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_store_name() -> String {
    "ShopHub".to_string()
}

fn default_api_url() -> String {
    "https://fakestoreapi.com".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            api_url: default_api_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` wins over it.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,storefront=debug,sqlx=warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl StorefrontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that keeps everything in memory. Used by tests and demos.
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.storage.backend = StorageBackend::Memory;
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform config dir)
    /// 3. `STOREFRONT_*` environment variables
    pub fn load(config_path: Option<PathBuf>) -> StateResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> StateResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StateResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StateError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    pub fn validate(&self) -> StateResult<()> {
        if self.storage.cart_key.trim().is_empty() {
            return Err(StateError::Config("cart_key must not be empty".into()));
        }

        let url = &self.store.api_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(StateError::Config(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(StateError::Config("database_path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("STOREFRONT_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(_) => warn!(backend = %backend, "Unknown storage backend in environment"),
            }
        }

        if let Some(path) = lookup("STOREFRONT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("STOREFRONT_CART_KEY") {
            self.storage.cart_key = key;
        }

        if let Some(name) = lookup("STOREFRONT_APP_NAME") {
            self.store.name = name;
        }

        if let Some(url) = lookup("STOREFRONT_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.store.api_url = url;
        }

        if let Some(filter) = lookup("STOREFRONT_LOG") {
            self.logging.filter = filter;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "shop")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn cart_key(&self) -> &str {
        &self.storage.cart_key
    }

    /// The SQLite file to open: the configured path, else the data dir.
    pub fn database_path(&self) -> StateResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }
        directories::ProjectDirs::from("com", "storefront", "shop")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .ok_or_else(|| StateError::Config("No data directory available".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("sqlite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!("MEMORY".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.backend(), StorageBackend::Sqlite);
        assert_eq!(config.cart_key(), "cart-storage");
        assert_eq!(config.store.name, "ShopHub");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = StorefrontConfig::from_toml(
            r#"
            [storage]
            backend = "memory"

            [store]
            name = "Corner Shop"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend(), StorageBackend::Memory);
        assert_eq!(config.cart_key(), "cart-storage");
        assert_eq!(config.store.name, "Corner Shop");
        assert_eq!(config.store.api_url, "https://fakestoreapi.com");
        assert_eq!(config.logging.filter, "info,storefront=debug,sqlx=warn");
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = StorefrontConfig::from_toml("[storage]\nbackend = \"tape\"").unwrap_err();
        assert!(matches!(err, StateError::Toml(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = StorefrontConfig::default();
        config.apply_env_overrides(env(&[
            ("STOREFRONT_STORAGE_BACKEND", "memory"),
            ("STOREFRONT_DB_PATH", "/tmp/shop.db"),
            ("STOREFRONT_CART_KEY", "guest-cart"),
            ("STOREFRONT_APP_NAME", "Corner Shop"),
            ("STOREFRONT_LOG", "warn"),
        ]));

        assert_eq!(config.backend(), StorageBackend::Memory);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.cart_key(), "guest-cart");
        assert_eq!(config.store.name, "Corner Shop");
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_unknown_env_backend_ignored() {
        let mut config = StorefrontConfig::default();
        config.apply_env_overrides(env(&[("STOREFRONT_STORAGE_BACKEND", "tape")]));
        assert_eq!(config.backend(), StorageBackend::Sqlite);
    }

    #[test]
    fn test_validation() {
        let mut config = StorefrontConfig::default();

        config.storage.cart_key = "  ".to_string();
        assert!(config.validate().is_err());

        config.storage.cart_key = "cart-storage".to_string();
        config.store.api_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.store.api_url = "http://localhost:3000".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("storefront-config-{}", uuid::Uuid::new_v4()))
            .join("config.toml");

        let mut config = StorefrontConfig::in_memory();
        config.storage.cart_key = "saved-cart".to_string();
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[storage]"));
        assert!(contents.contains("backend = \"memory\""));

        let loaded = StorefrontConfig::from_toml(&contents).unwrap();
        assert_eq!(loaded, config);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
