//! Error types for the dual-approval subsystem
//!
//! Precondition violations, integrity violations and duplicate submissions
//! all surface here as typed failures. None of them panic and none are
//! retried by the core.

use crate::domain::CheckpointStatus;
use thiserror::Error;

/// Key-value store adapter errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Docking result verification failures.
///
/// Either of these is treated as miner misbehavior by the checkpoint manager.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// The result references a job that is not part of the checkpoint batch
    #[error("Job {job_id} is not part of the checkpoint batch")]
    JobNotInCheckpoint { job_id: String },

    /// The declared result hash does not match the recomputed one
    #[error("Result hash mismatch: expected {expected}, got {actual}")]
    ResultHashMismatch { expected: String, actual: String },
}

/// Configuration validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("checkpoint_interval must be greater than zero")]
    ZeroCheckpointInterval,

    #[error("checkpoint_threshold_percent must be within 1..=100, got {0}")]
    ThresholdOutOfRange(u8),

    #[error("initial_reputation {initial} exceeds max_reputation {max}")]
    InitialReputationAboveMax { initial: u64, max: u64 },
}

/// Dual-approval subsystem errors
#[derive(Debug, Error)]
pub enum DualApprovalError {
    /// A checkpoint already exists at this height
    #[error("Checkpoint already exists at height {height}")]
    AlreadyExists { height: u64 },

    /// Checkpoint not found
    #[error("Checkpoint not found at height {height}")]
    CheckpointNotFound { height: u64 },

    /// No checkpoint has been opened yet
    #[error("No pending checkpoint")]
    NoPendingCheckpoint,

    /// The current checkpoint no longer accepts approvals
    #[error("Checkpoint at height {height} is not open for approvals (status {status:?})")]
    CheckpointNotPending {
        height: u64,
        status: CheckpointStatus,
    },

    /// Approval is bound to a different checkpoint snapshot
    #[error("Checkpoint hash mismatch: expected {expected}, got {actual}")]
    CheckpointHashMismatch { expected: String, actual: String },

    /// Docking result failed verification (miner has been slashed)
    #[error("Invalid docking result: {0}")]
    InvalidDockingResult(#[from] VerificationError),

    /// Miner already approved this checkpoint
    #[error("Miner {address} already approved checkpoint {height}")]
    DuplicateApproval { address: String, height: u64 },

    /// Approval submitted by an unknown miner
    #[error("Miner not registered: {address}")]
    MinerNotRegistered { address: String },

    /// Miner is slashed or below the reputation floor
    #[error("Miner {address} not eligible (reputation {reputation}, slashed {slashed})")]
    MinerNotEligible {
        address: String,
        reputation: u64,
        slashed: bool,
    },

    /// Registration for an address that is already known
    #[error("Miner already registered: {address}")]
    AlreadyRegistered { address: String },

    /// Miner lookup miss
    #[error("Miner not found: {address}")]
    MinerNotFound { address: String },

    /// Request failed stateless field validation
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] KVStoreError),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl DualApprovalError {
    /// Short machine-readable label, used for metrics and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "already_exists",
            Self::CheckpointNotFound { .. } => "checkpoint_not_found",
            Self::NoPendingCheckpoint => "no_pending_checkpoint",
            Self::CheckpointNotPending { .. } => "checkpoint_not_pending",
            Self::CheckpointHashMismatch { .. } => "checkpoint_hash_mismatch",
            Self::InvalidDockingResult(_) => "invalid_docking_result",
            Self::DuplicateApproval { .. } => "duplicate_approval",
            Self::MinerNotRegistered { .. } => "miner_not_registered",
            Self::MinerNotEligible { .. } => "miner_not_eligible",
            Self::AlreadyRegistered { .. } => "already_registered",
            Self::MinerNotFound { .. } => "miner_not_found",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Storage(_) => "storage",
            Self::Serialization { .. } => "serialization",
            Self::Config(_) => "config",
        }
    }
}

/// Result type for dual-approval operations
pub type DualApprovalResult<T> = Result<T, DualApprovalError>;
