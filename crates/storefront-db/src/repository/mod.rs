//! # Repository Module
//!
//! SQL lives here and nowhere else.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteStorage (storefront-state)                                       │
//! │       │                                                                 │
//! │       │  db.slots().set("cart-storage", json)                           │
//! │       ▼                                                                 │
//! │  StorageSlotRepository                                                  │
//! │  ├── get(&self, key)                                                    │
//! │  ├── get_entry(&self, key)                                              │
//! │  ├── set(&self, key, value)        (upsert)                             │
//! │  ├── remove(&self, key)                                                 │
//! │  └── keys(&self)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  storage_slots table                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod slot;
