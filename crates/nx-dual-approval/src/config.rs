use crate::domain::QuorumPolicy;
use crate::error::ConfigError;

/// Dual-approval configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DualApprovalConfig {
    /// Blocks between checkpoints (a checkpoint opens at every multiple)
    pub checkpoint_interval: u64,
    /// Absolute minimum number of approvals to finalize
    pub min_checkpoint_signers: usize,
    /// Required approval percentage of known miners (integer, truncating)
    pub checkpoint_threshold_percent: u8,
    /// Blocks a checkpoint may stay pending before it expires
    pub expiry_window: u64,
    /// Docking jobs pulled into each checkpoint batch
    pub jobs_per_checkpoint: usize,
    /// Reputation floor for submitting approvals
    pub min_participation_reputation: u64,
    /// Reputation assigned at registration
    pub initial_reputation: u64,
    /// Reputation ceiling
    pub max_reputation: u64,
    /// Reputation gained per accepted approval
    pub approval_reward: u64,
    /// Reputation lost per slash
    pub slash_penalty: u64,
}

impl Default for DualApprovalConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 200, // ~10 min at 3s blocks
            min_checkpoint_signers: 5,
            checkpoint_threshold_percent: 67,
            expiry_window: 100,
            jobs_per_checkpoint: 10,
            min_participation_reputation: 100,
            initial_reputation: 500,
            max_reputation: 1000,
            approval_reward: 10,
            slash_penalty: 200,
        }
    }
}

impl DualApprovalConfig {
    /// Reject configurations the state machine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.checkpoint_interval == 0 {
            return Err(ConfigError::ZeroCheckpointInterval);
        }
        if !(1..=100).contains(&self.checkpoint_threshold_percent) {
            return Err(ConfigError::ThresholdOutOfRange(
                self.checkpoint_threshold_percent,
            ));
        }
        if self.initial_reputation > self.max_reputation {
            return Err(ConfigError::InitialReputationAboveMax {
                initial: self.initial_reputation,
                max: self.max_reputation,
            });
        }
        Ok(())
    }

    /// Quorum rule derived from this configuration.
    pub fn quorum(&self) -> QuorumPolicy {
        QuorumPolicy::new(self.min_checkpoint_signers, self.checkpoint_threshold_percent)
    }
}
