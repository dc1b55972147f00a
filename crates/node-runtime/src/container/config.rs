//! # Node Configuration
//!
//! Runtime parameters read from the environment. Every value falls back to
//! the dual-approval defaults.

use nx_dual_approval::{ConfigError, DualApprovalConfig};
use std::path::PathBuf;
use thiserror::Error;

/// Ledger storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Volatile in-process store
    #[default]
    Memory,
    /// RocksDB under `data_dir` (requires the `rocksdb` feature)
    RocksDb,
}

impl std::str::FromStr for StorageBackend {
    type Err = NodeConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "rocksdb" => Ok(Self::RocksDb),
            other => Err(NodeConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub storage_backend: StorageBackend,
    /// Root directory for durable storage
    pub data_dir: PathBuf,
    pub dual_approval: DualApprovalConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
            dual_approval: DualApprovalConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeConfigError {
    #[error("Unknown storage backend '{0}' (expected memory or rocksdb)")]
    UnknownBackend(String),

    #[error("Invalid value '{value}' for {var}")]
    InvalidValue { var: String, value: String },

    #[error("Storage backend rocksdb requires the 'rocksdb' feature")]
    BackendUnavailable,

    #[error(transparent)]
    DualApproval(#[from] ConfigError),
}

fn parse_var<T, F>(lookup: &F, var: &str, target: &mut T) -> Result<(), NodeConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(var) {
        *target = value.trim().parse().map_err(|_| NodeConfigError::InvalidValue {
            var: var.to_string(),
            value,
        })?;
    }
    Ok(())
}

impl NodeConfig {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `NX_STORAGE_BACKEND`: `memory` (default) or `rocksdb`
    /// - `NX_DATA_DIR`: storage root (default: ./data)
    /// - `NX_CHECKPOINT_INTERVAL`: blocks between checkpoints (default: 200)
    /// - `NX_EXPIRY_WINDOW`: blocks before a pending checkpoint expires (default: 100)
    /// - `NX_MIN_SIGNERS`: absolute approval floor (default: 5)
    /// - `NX_THRESHOLD_PERCENT`: percentage approval floor (default: 67)
    pub fn from_env() -> Result<Self, NodeConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NodeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(backend) = lookup("NX_STORAGE_BACKEND") {
            config.storage_backend = backend.parse()?;
        }
        if let Some(dir) = lookup("NX_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        let da = &mut config.dual_approval;
        parse_var(&lookup, "NX_CHECKPOINT_INTERVAL", &mut da.checkpoint_interval)?;
        parse_var(&lookup, "NX_EXPIRY_WINDOW", &mut da.expiry_window)?;
        parse_var(&lookup, "NX_MIN_SIGNERS", &mut da.min_checkpoint_signers)?;
        parse_var(&lookup, "NX_THRESHOLD_PERCENT", &mut da.checkpoint_threshold_percent)?;

        Ok(config)
    }

    /// Check the configuration before startup.
    pub fn validate(&self) -> Result<(), NodeConfigError> {
        if self.storage_backend == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(NodeConfigError::BackendUnavailable);
        }
        self.dual_approval.validate()?;
        Ok(())
    }

    /// Directory holding the ledger database.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("dual_approval")
    }
}
