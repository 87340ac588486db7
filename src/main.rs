use blocks_minted_adjustment::account::{AccountData, InMemoryAccountRepository};
use blocks_minted_adjustment::adjustment::{AdjustmentConfig, AdjustmentDataset};
use blocks_minted_adjustment::blockchain::{Blockchain, BlockchainParams};
use blocks_minted_adjustment::config::NodeConfig;
use dotenvy::dotenv;
use log::info;
use std::error::Error;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn Error>> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env()?;

    // A node must not start with params or a dataset it cannot interpret.
    let params = match &config.params_path {
        Some(path) => BlockchainParams::load(path)?,
        None => BlockchainParams::bundled()?,
    };
    let dataset = match &config.dataset_path {
        Some(path) => AdjustmentDataset::load(path)?,
        None => AdjustmentDataset::bundled()?,
    };
    let dataset = Arc::new(dataset);
    let adjustment = AdjustmentConfig::new(Arc::clone(&dataset), &params, config.strict_digest)?;

    println!(
        "⛓️ Starting dev chain: {} adjustment accounts, activation at block #{}",
        dataset.len(),
        params.blocks_minted_adjustment_height
    );

    // Dev seed: every listed account has minted exactly the level 1 threshold
    // and still carries its grant.
    let mut repository = InMemoryAccountRepository::new();
    let minted = adjustment.thresholds.as_slice().get(1).copied().unwrap_or(0);
    let minted = i32::try_from(minted).unwrap_or(i32::MAX);
    for record in dataset.records() {
        let mut account = AccountData::new(record.address.clone());
        account.blocks_minted = minted;
        account.blocks_minted_adjustment = record.delta;
        account.level = adjustment
            .thresholds
            .level_for(account.effective_blocks_minted());
        repository.insert(account);
    }
    info!("Seeded {} accounts at {} blocks minted", repository.len(), minted);

    let mut chain = Blockchain::new(params.blocks_minted_adjustment_height, adjustment);
    let target = config
        .simulate_blocks
        .unwrap_or(params.blocks_minted_adjustment_height + 2);

    while chain.height() < target {
        let (block, outcome) = chain.process_block(&mut repository)?;
        if let Some(outcome) = outcome {
            info!("Block #{} adjustment: {:?}", block.height, outcome);
        }
    }
    log_levels(&repository, "after processing");

    while chain.height() >= chain.adjustment_height() && chain.height() > 0 {
        let (block, outcome) = chain.orphan_block(&mut repository)?;
        if let Some(outcome) = outcome {
            info!("Block #{} orphan adjustment: {:?}", block.height, outcome);
        }
    }
    log_levels(&repository, "after orphaning");

    Ok(())
}

fn log_levels(repository: &InMemoryAccountRepository, stage: &str) {
    let mut accounts: Vec<&AccountData> = repository.iter().collect();
    accounts.sort_by(|a, b| a.address.cmp(&b.address));
    for account in accounts {
        info!(
            "{stage}: {} effective={} adjustment={} level={}",
            account.address,
            account.effective_blocks_minted(),
            account.blocks_minted_adjustment,
            account.level
        );
    }
}
