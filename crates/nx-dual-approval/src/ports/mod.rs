//! Ports module for the dual-approval subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::{ApprovalReceipt, CheckpointApi, MinerRegistryApi, TickOutcome};
pub use outbound::{
    ApprovalLedger, BatchOperation, KeyValueStore, LedgerBatch, LedgerWrite, ScanResult,
    TimeSource, WorkQueue,
};
