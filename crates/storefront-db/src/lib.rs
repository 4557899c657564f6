//! # storefront-db: SQLite Layer for the Storefront
//!
//! Durable key/value slots for client state, on SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PersistentCartStore ──► CartPersistence ──► SqliteStorage             │
//! │                                                   │                     │
//! │  ┌────────────────────────────────────────────────▼────────────────┐   │
//! │  │                   storefront-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌─────────────┐  │   │
//! │  │   │   Database    │    │ StorageSlot        │  │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ Repository         │  │ (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ get / set / remove │  │ 001_slots   │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │               <data dir>/storefront.db  (or :memory:)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("storefront.db")).await?;
//! db.slots().set("cart-storage", "{\"items\":[]}").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::slot::{StorageSlot, StorageSlotRepository};
