//! # storefront-state: Session State for the Storefront
//!
//! The stateful layer between the UI and [`storefront_core`]: a cart that
//! persists itself, the simulated checkout, configuration and logging.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  StorefrontConfig ──► open_cart_store()                                 │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  UI ──────────────► PersistentCartStore ──► place_order() ──► Order     │
//! │                       │           │                                     │
//! │                       ▼           ▼                                     │
//! │            core::Cart (pure)   CartPersistence ("cart-storage")         │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                         dyn SlotStorage                                 │
//! │                   ┌───────────┴────────────┐                            │
//! │             MemoryStorage            SqliteStorage ──► storefront-db    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_state::{init_tracing, open_cart_store, StorefrontConfig};
//!
//! let config = StorefrontConfig::load_or_default(None);
//! init_tracing(&config.logging.filter);
//!
//! let store = open_cart_store(&config).await?;
//! store.add_item(&product, 2).await?;
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod persistence;
pub mod storage;

use std::sync::Arc;

use storefront_db::DbConfig;
use tracing::{info, Subscriber};
use tracing_subscriber::EnvFilter;

pub use cart::{CartUpdate, PersistentCartStore};
pub use checkout::place_order;
pub use config::{StorageBackend, StorefrontConfig};
pub use error::{ApiError, ErrorCode, StateError, StateResult};
pub use persistence::{CartPersistence, DEFAULT_CART_KEY};
pub use storage::{MemoryStorage, SlotStorage, SqliteStorage};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_state=trace` - Trace the cart store
/// - unset: `default_filter` (usually `config.logging.filter`)
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing::subscriber::set_global_default(log_subscriber(filter));
}

/// The fmt subscriber, gated only by `filter`.
fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}

/// Builds the storage `config` asks for and opens the cart store on it.
///
/// ## Errors
/// `Config` when no database path can be resolved, `Storage` when the
/// SQLite file cannot be opened or migrated.
pub async fn open_cart_store(config: &StorefrontConfig) -> StateResult<PersistentCartStore> {
    let storage: Arc<dyn SlotStorage> = match config.backend() {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::Sqlite => {
            let path = config.database_path()?;
            info!(?path, "Opening cart database");
            Arc::new(SqliteStorage::open(DbConfig::new(path)).await?)
        }
    };

    let persistence = CartPersistence::with_key(storage, config.cart_key());
    Ok(PersistentCartStore::open(persistence).await)
}
