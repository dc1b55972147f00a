//! # Adapters
//!
//! Port implementations provided by the host.

pub mod storage;
