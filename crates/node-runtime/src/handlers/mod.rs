//! # Event Handlers
//!
//! Bus handlers that drive the dual-approval machine.

pub mod end_block;

pub use end_block::EndBlockHandler;
