//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports.

mod clock;
mod ledger;
pub mod storage;
mod work_queue;

pub use clock::{ManualClock, SystemTimeSource};
pub use ledger::KvLedger;
pub use storage::InMemoryKVStore;
pub use work_queue::InMemoryWorkQueue;
