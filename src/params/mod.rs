//! Network parameters
//!
//! One `ChainParams` per network identity. The selection is made once at
//! startup (see `config`) and handed to the consensus components; nothing
//! in this crate reads a global "current network".

mod checkpoints;

pub use checkpoints::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{
    Amount, Height, CHECKPOINT_SPAN, COIN, COIN_YEAR_REWARD, LAST_POW_YEARS, ONE_YEAR_BLOCKS,
    PREMINE,
};

/// Network identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Main,
    #[serde(alias = "testnet")]
    Test,
}

/// Whether the local node stores full blocks or headers only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeMode {
    #[default]
    Full,
    Thin,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseParamError {
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
    #[error("Unknown node mode: {0}")]
    UnknownNodeMode(String),
}

impl Network {
    /// Network id string
    pub fn id(&self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Network {
    type Err = ParseParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            _ => Err(ParseParamError::UnknownNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for NodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeMode::Full => "full",
            NodeMode::Thin => "thin",
        })
    }
}

impl FromStr for NodeMode {
    type Err = ParseParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(NodeMode::Full),
            "thin" => Ok(NodeMode::Thin),
            _ => Err(ParseParamError::UnknownNodeMode(s.to_string())),
        }
    }
}

/// Monetary schedule constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardSchedule {
    /// One "year" expressed in blocks; width of every tier band
    pub year_blocks: Height,
    /// Subsidy of each block at height <= 1
    pub premine: Amount,
    /// Work subsidy per four-year band, lowest band first
    pub work_tiers: [Amount; 5],
    /// Yearly stake rate before the epoch multiplier
    pub coin_year_reward: Amount,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            year_blocks: ONE_YEAR_BLOCKS,
            premine: PREMINE * COIN,
            work_tiers: [
                20 * COIN,
                10 * COIN,
                5 * COIN,
                COIN * 5 / 2,
                COIN * 5 / 4,
            ],
            coin_year_reward: COIN_YEAR_REWARD,
        }
    }
}

/// Parameters of one network, as far as consensus policy needs them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainParams {
    pub network: Network,
    pub rewards: RewardSchedule,
    pub checkpoints: CheckpointMap,
    /// Sync-checkpoint window
    pub checkpoint_span: Height,
    /// Last height at which a proof-of-work block is accepted
    pub last_pow_block: Height,
}

impl ChainParams {
    /// Main network
    pub fn main() -> Self {
        Self {
            network: Network::Main,
            rewards: RewardSchedule::default(),
            checkpoints: checkpoints_from_rows(MAIN_CHECKPOINT_ROWS),
            checkpoint_span: CHECKPOINT_SPAN,
            last_pow_block: ONE_YEAR_BLOCKS * LAST_POW_YEARS,
        }
    }

    /// Test network
    pub fn test() -> Self {
        Self {
            network: Network::Test,
            rewards: RewardSchedule::default(),
            checkpoints: checkpoints_from_rows(TEST_CHECKPOINT_ROWS),
            checkpoint_span: CHECKPOINT_SPAN,
            last_pow_block: 110,
        }
    }

    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Main => Self::main(),
            Network::Test => Self::test(),
        }
    }
}
