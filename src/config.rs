//! Startup configuration
//!
//! Network and node mode are chosen exactly once, here, and flow into the
//! consensus components through their constructors.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consensus::{CheckpointAuthority, RewardPolicy};
use crate::params::{ChainParams, Network, NodeMode};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Node configuration as read from JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    pub network: Network,
    pub node_mode: NodeMode,
    /// Trace every computed block reward at debug level
    pub print_creation: bool,
}

/// Consensus components for one network and node mode
#[derive(Debug, Clone)]
pub struct Consensus {
    pub params: ChainParams,
    pub rewards: RewardPolicy,
    pub checkpoints: CheckpointAuthority,
}

impl NodeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Build the consensus components this configuration selects
    pub fn build(&self) -> Consensus {
        let params = ChainParams::for_network(self.network);
        let rewards = RewardPolicy::new(&params, self.print_creation);
        let checkpoints = CheckpointAuthority::from_params(&params, self.node_mode);
        Consensus {
            params,
            rewards,
            checkpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::from_json_str("{}").unwrap();
        assert_eq!(config.network, Network::Main);
        assert_eq!(config.node_mode, NodeMode::Full);
        assert!(!config.print_creation);
    }

    #[test]
    fn test_parse_full_config() {
        let config = NodeConfig::from_json_str(
            r#"{"network": "testnet", "node_mode": "thin", "print_creation": true}"#,
        )
        .unwrap();
        assert_eq!(config.network, Network::Test);
        assert_eq!(config.node_mode, NodeMode::Thin);
        assert!(config.print_creation);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = NodeConfig::from_json_str(r#"{"regtest": true}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = NodeConfig::load("/nonexistent/hybrid-node.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_build_selects_network_and_mode() {
        let config = NodeConfig {
            network: Network::Test,
            node_mode: NodeMode::Thin,
            print_creation: false,
        };
        let consensus = config.build();
        assert_eq!(consensus.params.network, Network::Test);
        assert_eq!(consensus.checkpoints.mode(), NodeMode::Thin);
        assert_eq!(consensus.checkpoints.total_blocks_estimate(), 0);

        let main = NodeConfig::default().build();
        assert_eq!(main.checkpoints.total_blocks_estimate(), 1);
    }
}
