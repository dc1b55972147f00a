//! Key-value backed approval ledger
//!
//! Key layout:
//!
//! | Key | Value |
//! |-----|-------|
//! | `checkpoint:<height>` | bincode `Checkpoint` |
//! | `checkpoint:pending` | bincode `u64` |
//! | `checkpoint:latest` | bincode `u64` |
//! | `miner:<address>` | bincode `Miner` |
//! | `miners:count` | bincode `u64` |

use crate::domain::{Checkpoint, Miner};
use crate::error::{DualApprovalError, DualApprovalResult};
use crate::ports::outbound::{
    ApprovalLedger, BatchOperation, KeyValueStore, LedgerBatch, LedgerWrite,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

const CHECKPOINT_PREFIX: &str = "checkpoint:";
const PENDING_KEY: &[u8] = b"checkpoint:pending";
const LATEST_KEY: &[u8] = b"checkpoint:latest";
const MINER_PREFIX: &str = "miner:";
const MINER_COUNT_KEY: &[u8] = b"miners:count";

fn checkpoint_key(height: u64) -> Vec<u8> {
    format!("{CHECKPOINT_PREFIX}{height}").into_bytes()
}

fn miner_key(address: &str) -> Vec<u8> {
    format!("{MINER_PREFIX}{address}").into_bytes()
}

fn encode<T: Serialize>(value: &T) -> DualApprovalResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| DualApprovalError::Serialization {
        reason: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> DualApprovalResult<T> {
    bincode::deserialize(bytes).map_err(|e| DualApprovalError::Serialization {
        reason: e.to_string(),
    })
}

/// [`ApprovalLedger`] over any [`KeyValueStore`].
pub struct KvLedger<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T: DeserializeOwned>(&self, key: &[u8]) -> DualApprovalResult<Option<T>> {
        match self.store.get(key)? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }
}

impl<S: KeyValueStore> ApprovalLedger for KvLedger<S> {
    fn checkpoint(&self, height: u64) -> DualApprovalResult<Option<Checkpoint>> {
        self.read(&checkpoint_key(height))
    }

    fn has_checkpoint(&self, height: u64) -> DualApprovalResult<bool> {
        Ok(self.store.exists(&checkpoint_key(height))?)
    }

    fn pending_height(&self) -> DualApprovalResult<Option<u64>> {
        self.read(PENDING_KEY)
    }

    fn latest_height(&self) -> DualApprovalResult<Option<u64>> {
        self.read(LATEST_KEY)
    }

    fn list_checkpoints(&self) -> DualApprovalResult<Vec<Checkpoint>> {
        let mut checkpoints = Vec::new();
        for (key, value) in self.store.prefix_scan(CHECKPOINT_PREFIX.as_bytes())? {
            // Pointer keys share the prefix but have no numeric suffix
            let is_record = std::str::from_utf8(&key[CHECKPOINT_PREFIX.len()..])
                .ok()
                .and_then(|suffix| suffix.parse::<u64>().ok())
                .is_some();
            if is_record {
                checkpoints.push(decode::<Checkpoint>(&value)?);
            }
        }
        checkpoints.sort_by_key(|cp| cp.height);
        Ok(checkpoints)
    }

    fn miner(&self, address: &str) -> DualApprovalResult<Option<Miner>> {
        self.read(&miner_key(address))
    }

    fn has_miner(&self, address: &str) -> DualApprovalResult<bool> {
        Ok(self.store.exists(&miner_key(address))?)
    }

    fn miner_count(&self) -> DualApprovalResult<u64> {
        Ok(self.read(MINER_COUNT_KEY)?.unwrap_or(0))
    }

    fn list_miners(&self) -> DualApprovalResult<Vec<Miner>> {
        let mut miners = self
            .store
            .prefix_scan(MINER_PREFIX.as_bytes())?
            .into_iter()
            .map(|(_, value)| decode::<Miner>(&value))
            .collect::<DualApprovalResult<Vec<_>>>()?;
        miners.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(miners)
    }

    fn commit(&mut self, batch: LedgerBatch) -> DualApprovalResult<()> {
        let mut ops = Vec::with_capacity(batch.len());
        for write in batch.into_writes() {
            let op = match write {
                LedgerWrite::Checkpoint(cp) => {
                    BatchOperation::put(checkpoint_key(cp.height), encode(&cp)?)
                }
                LedgerWrite::PendingHeight(h) => BatchOperation::put(PENDING_KEY, encode(&h)?),
                LedgerWrite::LatestHeight(h) => BatchOperation::put(LATEST_KEY, encode(&h)?),
                LedgerWrite::Miner(m) => BatchOperation::put(miner_key(&m.address), encode(&m)?),
                LedgerWrite::MinerCount(n) => BatchOperation::put(MINER_COUNT_KEY, encode(&n)?),
            };
            ops.push(op);
        }

        debug!(writes = ops.len(), "[dual-approval] Committing ledger batch");
        self.store.atomic_batch_write(ops)?;
        Ok(())
    }
}
