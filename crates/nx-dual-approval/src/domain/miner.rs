//! Miner entity and reputation rules

use super::Timestamp;
use serde::{Deserialize, Serialize};

/// A registered miner identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Miner {
    /// Unique key
    pub address: String,
    pub public_key: String,
    pub compute_power: u64,
    pub jobs_completed: u64,
    /// Always within `[0, max_reputation]`
    pub reputation: u64,
    pub registered_at: Timestamp,
    pub last_active_at: Timestamp,
    /// One-way: once set it is never cleared
    pub slashed: bool,
}

impl Miner {
    pub fn new(
        address: impl Into<String>,
        public_key: impl Into<String>,
        initial_reputation: u64,
        now: Timestamp,
    ) -> Self {
        Self {
            address: address.into(),
            public_key: public_key.into(),
            compute_power: 0,
            jobs_completed: 0,
            reputation: initial_reputation,
            registered_at: now,
            last_active_at: now,
            slashed: false,
        }
    }

    /// Not slashed and at or above the reputation floor
    pub fn can_participate(&self, min_reputation: u64) -> bool {
        !self.slashed && self.reputation >= min_reputation
    }

    /// Credit an accepted approval.
    pub fn record_approval(&mut self, reward: u64, max_reputation: u64, now: Timestamp) {
        self.jobs_completed = self.jobs_completed.saturating_add(1);
        self.last_active_at = now;
        self.reputation = self.reputation.saturating_add(reward).min(max_reputation);
    }

    /// Apply a slash penalty. Reputation floors at zero and a miner that
    /// reaches zero is marked slashed. Repeated slashing is stable.
    pub fn apply_slash(&mut self, penalty: u64) {
        self.reputation = self.reputation.saturating_sub(penalty);
        if self.reputation == 0 {
            self.slashed = true;
        }
    }
}
