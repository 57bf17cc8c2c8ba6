//! Block reward calculation
//!
//! Work reward is a tiered subsidy keyed off the block height. Stake reward
//! scales the destroyed coin-age by a yearly rate whose multiplier steps
//! down 4 -> 3 -> 2 -> 1, keyed off the *previous* block's height.
//!
//! Both are pure total functions: every node must derive byte-identical
//! amounts from the same inputs.

use tracing::debug;

use crate::chain::IndexEntry;
use crate::constants::{format_money, Amount, CoinAge, Height, STAKE_REWARD_DIVISOR};
use crate::params::{ChainParams, RewardSchedule};

/// Number of years covered by each work tier
const YEARS_PER_WORK_TIER: Height = 4;

/// Stake multipliers per year, first year first; later years use the last
const STAKE_MULTIPLIERS: [u128; 4] = [4, 3, 2, 1];

/// Minting policy for one network
#[derive(Debug, Clone, Copy)]
pub struct RewardPolicy {
    schedule: RewardSchedule,
    last_pow_block: Height,
    print_creation: bool,
}

impl RewardPolicy {
    /// Build from network parameters
    ///
    /// `print_creation` enables a debug trace line per computed reward.
    pub fn new(params: &ChainParams, print_creation: bool) -> Self {
        Self {
            schedule: params.rewards,
            last_pow_block: params.last_pow_block,
            print_creation,
        }
    }

    pub fn schedule(&self) -> &RewardSchedule {
        &self.schedule
    }

    /// Subsidy of a proof-of-work block at `height`, without fees
    ///
    /// Heights at or past the end of the last tier mint nothing.
    pub fn work_subsidy(&self, height: Height) -> Amount {
        if height <= 1 {
            return self.schedule.premine;
        }
        let year = self.schedule.year_blocks.max(1);
        let tier = height / year / YEARS_PER_WORK_TIER;
        usize::try_from(tier)
            .ok()
            .and_then(|t| self.schedule.work_tiers.get(t))
            .copied()
            .unwrap_or(0)
    }

    /// Coinbase value allowed for a proof-of-work block
    pub fn work_reward(&self, height: Height, fees: Amount) -> Amount {
        let subsidy = self.work_subsidy(height);
        if self.print_creation {
            debug!(
                height,
                "work reward: create={} subsidy={}",
                format_money(subsidy),
                subsidy
            );
        }
        subsidy.saturating_add(fees)
    }

    /// Stake multiplier in force for the block after `prev_height`
    pub fn stake_multiplier(&self, prev_height: Height) -> u128 {
        let year = self.schedule.year_blocks.max(1);
        let index = usize::try_from(prev_height / year)
            .unwrap_or(usize::MAX)
            .min(STAKE_MULTIPLIERS.len() - 1);
        STAKE_MULTIPLIERS[index]
    }

    /// Stake subsidy for `coin_age` coin-days, without fees
    ///
    /// `multiplier * rate * coin_age * 33 / (365 * 33 + 8)`, truncating.
    pub fn stake_subsidy(&self, prev_height: Height, coin_age: CoinAge) -> Amount {
        let numerator = self
            .stake_multiplier(prev_height)
            .saturating_mul(u128::from(self.schedule.coin_year_reward))
            .saturating_mul(u128::from(coin_age))
            .saturating_mul(33);
        Amount::try_from(numerator / STAKE_REWARD_DIVISOR).unwrap_or(Amount::MAX)
    }

    /// Coinstake value allowed for a block whose parent is at `prev_height`
    pub fn stake_reward(&self, prev_height: Height, coin_age: CoinAge, fees: Amount) -> Amount {
        let subsidy = self.stake_subsidy(prev_height, coin_age);
        if self.print_creation {
            debug!(
                prev_height,
                "stake reward: create={} coin_age={}",
                format_money(subsidy),
                coin_age
            );
        }
        subsidy.saturating_add(fees)
    }

    /// `stake_reward` keyed off a previous index node
    pub fn stake_reward_after<N: IndexEntry>(
        &self,
        prev: &N,
        coin_age: CoinAge,
        fees: Amount,
    ) -> Amount {
        self.stake_reward(prev.height(), coin_age, fees)
    }

    /// Whether a proof-of-work block is still accepted at `height`
    pub fn accepts_proof_of_work(&self, height: Height) -> bool {
        height <= self.last_pow_block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COIN, COIN_YEAR_REWARD, ONE_YEAR_BLOCKS, PREMINE};

    const Y: Height = ONE_YEAR_BLOCKS;

    fn policy() -> RewardPolicy {
        RewardPolicy::new(&ChainParams::main(), false)
    }

    #[test]
    fn test_premine_at_genesis_and_first_block() {
        let p = policy();
        assert_eq!(p.work_reward(0, 0), PREMINE * COIN);
        assert_eq!(p.work_reward(1, 0), PREMINE * COIN);
    }

    #[test]
    fn test_tier_boundaries() {
        let p = policy();
        assert_eq!(p.work_reward(2, 0), 20 * COIN);
        assert_eq!(p.work_reward(4 * Y - 1, 0), 20 * COIN);
        assert_eq!(p.work_reward(4 * Y, 0), 10 * COIN);
        assert_eq!(p.work_reward(8 * Y - 1, 0), 10 * COIN);
        assert_eq!(p.work_reward(8 * Y, 0), 5 * COIN);
        assert_eq!(p.work_reward(12 * Y, 0), 250_000_000);
        assert_eq!(p.work_reward(16 * Y, 0), 125_000_000);
        assert_eq!(p.work_reward(20 * Y - 1, 0), 125_000_000);
    }

    #[test]
    fn test_no_subsidy_after_last_tier() {
        let p = policy();
        assert_eq!(p.work_reward(20 * Y, 0), 0);
        assert_eq!(p.work_reward(u64::MAX, 0), 0);
        assert_eq!(p.work_reward(20 * Y, 777), 777);
    }

    #[test]
    fn test_fees_added() {
        let p = policy();
        assert_eq!(p.work_reward(100, 12_345), 20 * COIN + 12_345);
    }

    #[test]
    fn test_stake_multiplier_steps() {
        let p = policy();
        assert_eq!(p.stake_multiplier(0), 4);
        assert_eq!(p.stake_multiplier(Y - 1), 4);
        assert_eq!(p.stake_multiplier(Y), 3);
        assert_eq!(p.stake_multiplier(2 * Y), 2);
        assert_eq!(p.stake_multiplier(3 * Y), 1);
        assert_eq!(p.stake_multiplier(u64::MAX), 1);
    }

    #[test]
    fn test_stake_reward_truncates() {
        let p = policy();
        // 4 * 1_000_000 * 1 * 33 / 12053 = 10951.6... -> 10951
        assert_eq!(p.stake_reward(0, 1, 0), 10_951);
        // last band: 1_000_000 * 365 * 33 / 12053 = 999336.2... -> 999336
        assert_eq!(p.stake_reward(3 * Y, 365, 0), 999_336);
        assert_eq!(p.stake_reward(3 * Y, 365, 5), 999_341);
    }

    #[test]
    fn test_stake_reward_zero_coin_age() {
        let p = policy();
        assert_eq!(p.stake_reward(0, 0, 42), 42);
    }

    #[test]
    fn test_stake_reward_keyed_off_previous_height() {
        let p = policy();
        // Candidate block sits at Y, but its parent is still in year one.
        let in_year_one = p.stake_reward(Y - 1, 1000, 0);
        let in_year_two = p.stake_reward(Y, 1000, 0);
        assert!(in_year_one > in_year_two);
        assert_eq!(
            in_year_one,
            (4 * u128::from(COIN_YEAR_REWARD) * 1000 * 33 / STAKE_REWARD_DIVISOR) as u64
        );
    }

    #[test]
    fn test_stake_reward_after_node() {
        use crate::chain::ThinIndexNode;
        use crate::crypto::Hash;

        let p = policy();
        let prev = ThinIndexNode {
            height: 2 * Y,
            hash: Hash::zero(),
            prev: None,
        };
        assert_eq!(p.stake_reward_after(&prev, 10, 1), p.stake_reward(2 * Y, 10, 1));
    }

    #[test]
    fn test_huge_coin_age_saturates() {
        let p = policy();
        assert_eq!(p.stake_reward(0, u64::MAX, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_print_creation_does_not_change_value() {
        let traced = RewardPolicy::new(&ChainParams::main(), true);
        let plain = policy();
        assert_eq!(traced.work_reward(5, 3), plain.work_reward(5, 3));
        assert_eq!(traced.stake_reward(5, 300, 3), plain.stake_reward(5, 300, 3));
    }

    #[test]
    fn test_pow_cutoff() {
        let main = policy();
        assert!(main.accepts_proof_of_work(20 * Y));
        assert!(!main.accepts_proof_of_work(20 * Y + 1));

        let test = RewardPolicy::new(&ChainParams::test(), false);
        assert!(test.accepts_proof_of_work(110));
        assert!(!test.accepts_proof_of_work(111));
    }
}
