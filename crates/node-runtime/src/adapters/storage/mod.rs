//! # Storage Adapters
//!
//! Ledger backends selectable at startup.
//!
//! Enable the `rocksdb` feature for the durable backend:
//!
//! ```toml
//! node-runtime = { path = "...", features = ["rocksdb"] }
//! ```

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore, CF_DUAL_APPROVAL};

pub use nx_dual_approval::InMemoryKVStore;
