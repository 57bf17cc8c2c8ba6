//! Hybrid node consensus inspector
//!
//! Loads the node configuration, builds the consensus components it selects
//! and prints the minting schedule and checkpoint summary.
//!
//! Usage: `hybrid-node [config.json]`

use hybrid_core::config::NodeConfig;
use hybrid_core::constants::format_money;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match NodeConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => NodeConfig::default(),
    };

    let consensus = config.build();
    let params = &consensus.params;
    let year = params.rewards.year_blocks;
    info!(network = %params.network, mode = %config.node_mode, "consensus initialised");

    println!("Network:            {}", params.network);
    println!("Node mode:          {}", config.node_mode);
    println!("Checkpoints:        {}", params.checkpoints.len());
    println!("Blocks estimate:    {}", consensus.checkpoints.total_blocks_estimate());
    println!("Sync window:        {} blocks", consensus.checkpoints.span());
    println!("Last PoW block:     {}", params.last_pow_block);
    println!();
    println!("Work reward schedule:");
    println!("  {:>12}  {:>18}", 0, format_money(consensus.rewards.work_subsidy(0)));
    for band in 0..5u64 {
        let start = (band * 4 * year).max(2);
        println!(
            "  {:>12}  {:>18}",
            start,
            format_money(consensus.rewards.work_subsidy(start))
        );
    }
    println!(
        "  {:>12}  {:>18}",
        20 * year,
        format_money(consensus.rewards.work_subsidy(20 * year))
    );
    println!();
    let multipliers: Vec<u128> = (0..4u64)
        .map(|y| consensus.rewards.stake_multiplier(y * year))
        .collect();
    println!("Stake multipliers by year: {:?}", multipliers);
}
