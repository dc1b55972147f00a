//! Dual quorum rule
//!
//! Finalization needs both an absolute signer floor and a percentage of
//! the known miner population.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    pub min_signers: usize,
    pub threshold_percent: u8,
}

impl QuorumPolicy {
    pub fn new(min_signers: usize, threshold_percent: u8) -> Self {
        Self {
            min_signers,
            threshold_percent,
        }
    }

    /// Integer-truncated `approvals * 100 / total`, zero when `total == 0`.
    pub fn approval_percentage(approvals: usize, total_miners: u64) -> u64 {
        if total_miners == 0 {
            return 0;
        }
        (approvals as u64).saturating_mul(100) / total_miners
    }

    /// True when both floors hold.
    pub fn can_finalize(&self, approvals: usize, total_miners: u64) -> bool {
        approvals >= self.min_signers
            && Self::approval_percentage(approvals, total_miners)
                >= u64::from(self.threshold_percent)
    }
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        Self::new(5, 67)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_floor_blocks_small_population() {
        // 4 of 4 is 100% but below the signer floor
        assert!(!QuorumPolicy::default().can_finalize(4, 4));
    }

    #[test]
    fn test_percentage_floor_blocks_half() {
        assert!(!QuorumPolicy::default().can_finalize(5, 10));
    }

    #[test]
    fn test_seventy_percent_finalizes() {
        assert!(QuorumPolicy::default().can_finalize(7, 10));
    }

    #[test]
    fn test_truncation_at_boundary() {
        let policy = QuorumPolicy::default();
        // 5/7 = 71
        assert!(policy.can_finalize(5, 7));
        // 6/9 = 66.6 truncates to 66
        assert!(!policy.can_finalize(6, 9));
        assert!(policy.can_finalize(7, 9));
    }

    #[test]
    fn test_zero_population() {
        assert_eq!(QuorumPolicy::approval_percentage(3, 0), 0);
        assert!(!QuorumPolicy::new(0, 1).can_finalize(0, 0));
    }
}
