//! # Dual-Approval Metrics
//!
//! Prometheus metrics for checkpoint finality and miner behaviour.
//!
//! Enable with the `metrics` feature:
//! ```toml
//! nx-dual-approval = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `dual_approval_checkpoints_created_total`
//! - `dual_approval_checkpoints_finalized_total`
//! - `dual_approval_checkpoints_expired_total`
//! - `dual_approval_approvals_accepted_total`
//! - `dual_approval_approvals_rejected_total` (by reason)
//! - `dual_approval_miners_slashed_total`
//! - `dual_approval_registered_miners` - gauge of known miners

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref CHECKPOINTS_CREATED: IntCounter = register_int_counter!(
        "dual_approval_checkpoints_created_total",
        "Total number of checkpoints opened"
    )
    .expect("Failed to create CHECKPOINTS_CREATED metric");

    pub static ref CHECKPOINTS_FINALIZED: IntCounter = register_int_counter!(
        "dual_approval_checkpoints_finalized_total",
        "Total number of checkpoints finalized by miner quorum"
    )
    .expect("Failed to create CHECKPOINTS_FINALIZED metric");

    pub static ref CHECKPOINTS_EXPIRED: IntCounter = register_int_counter!(
        "dual_approval_checkpoints_expired_total",
        "Total number of checkpoints that expired without quorum"
    )
    .expect("Failed to create CHECKPOINTS_EXPIRED metric");

    pub static ref APPROVALS_ACCEPTED: IntCounter = register_int_counter!(
        "dual_approval_approvals_accepted_total",
        "Total number of miner approvals accepted"
    )
    .expect("Failed to create APPROVALS_ACCEPTED metric");

    /// Rejected approvals, labeled by error label
    pub static ref APPROVALS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "dual_approval_approvals_rejected_total",
        "Total number of miner approvals rejected",
        &["reason"]
    )
    .expect("Failed to create APPROVALS_REJECTED metric");

    pub static ref MINERS_SLASHED: IntCounter = register_int_counter!(
        "dual_approval_miners_slashed_total",
        "Total number of slash penalties applied"
    )
    .expect("Failed to create MINERS_SLASHED metric");

    pub static ref REGISTERED_MINERS: IntGauge = register_int_gauge!(
        "dual_approval_registered_miners",
        "Number of miners known to the registry"
    )
    .expect("Failed to create REGISTERED_MINERS metric");
}

#[cfg(feature = "metrics")]
pub fn record_checkpoint_created() {
    CHECKPOINTS_CREATED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_checkpoint_finalized() {
    CHECKPOINTS_FINALIZED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_checkpoint_expired() {
    CHECKPOINTS_EXPIRED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_approval_accepted() {
    APPROVALS_ACCEPTED.inc();
}

/// Record a rejected approval with its error label
#[cfg(feature = "metrics")]
pub fn record_approval_rejected(reason: &str) {
    APPROVALS_REJECTED.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_miner_slashed() {
    MINERS_SLASHED.inc();
}

#[cfg(feature = "metrics")]
pub fn set_registered_miners(count: u64) {
    REGISTERED_MINERS.set(i64::try_from(count).unwrap_or(i64::MAX));
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_checkpoint_created() {}

#[cfg(not(feature = "metrics"))]
pub fn record_checkpoint_finalized() {}

#[cfg(not(feature = "metrics"))]
pub fn record_checkpoint_expired() {}

#[cfg(not(feature = "metrics"))]
pub fn record_approval_accepted() {}

#[cfg(not(feature = "metrics"))]
pub fn record_approval_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_miner_slashed() {}

#[cfg(not(feature = "metrics"))]
pub fn set_registered_miners(_count: u64) {}
