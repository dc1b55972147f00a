//! # Nexus Test Suite
//!
//! Cross-crate tests for the dual-approval checkpoint machine.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── e2e_checkpoint.rs   # EndOfBlock → checkpoint → approvals → finality
//!     └── concurrency.rs      # Racing miners against one checkpoint
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p nx-tests
//! cargo test -p nx-tests integration::concurrency
//! ```

#![allow(dead_code)]

pub mod integration;
