//! Hybrid PoW/PoS consensus policy core
//!
//! Decides how many coins a block may mint (work reward by height, stake
//! reward by destroyed coin-age) and which part of the chain is immutable
//! (hardcoded checkpoints plus a trailing sync-checkpoint window).
//!
//! Works against both a fully validating index and a headers-only index.

pub mod consensus;
pub mod crypto;
pub mod chain;
pub mod params;
pub mod config;

/// Protocol constants - HARD-CODED, NEVER CONFIGURABLE
pub mod constants {
    /// Block height along a chain path
    pub type Height = u64;

    /// Amount in base units
    pub type Amount = u64;

    /// Coin-days destroyed by a stake transaction's inputs
    pub type CoinAge = u64;

    /// Base units per coin (8 decimal places)
    pub const COIN: Amount = 100_000_000;

    /// One hundredth of a coin
    pub const CENT: Amount = 1_000_000;

    /// One year of blocks at a one-minute target spacing
    pub const ONE_YEAR_BLOCKS: Height = 365 * 24 * 60;

    /// Coins minted by each block at height <= 1
    pub const PREMINE: Amount = 10_000_000;

    /// Yearly stake reward rate per coin-day, before the epoch multiplier
    pub const COIN_YEAR_REWARD: Amount = CENT;

    /// Denominator of the stake reward: days per year with the leap-day
    /// correction folded in (multiplied by 33 together with the numerator)
    pub const STAKE_REWARD_DIVISOR: u128 = 365 * 33 + 8;

    /// Sync-checkpoint window in blocks
    pub const CHECKPOINT_SPAN: Height = 500;

    /// Number of years during which proof-of-work blocks are accepted
    pub const LAST_POW_YEARS: Height = 20;

    /// Number of decimal places
    pub const DECIMAL_PLACES: u8 = 8;

    /// Render an amount as `coins.fraction` with all decimal places
    pub fn format_money(amount: Amount) -> String {
        format!(
            "{}.{:0width$}",
            amount / COIN,
            amount % COIN,
            width = usize::from(DECIMAL_PLACES)
        )
    }
}
