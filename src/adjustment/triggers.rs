use log::info;

use super::applier::{AdjustmentOutcome, apply};
use super::{AdjustmentConfig, AdjustmentError, Direction};
use crate::account::AccountRepository;
use crate::blockchain::Block;

/// Run when the activation block is processed: removes the dataset's grant.
pub fn on_block_applied<R>(
    block: &Block,
    config: &AdjustmentConfig,
    repository: &mut R,
) -> Result<AdjustmentOutcome, AdjustmentError>
where
    R: AccountRepository + ?Sized,
{
    info!(
        "Processing blocks minted adjustment at block #{} ({} accounts)",
        block.height,
        config.dataset.len()
    );
    apply(Direction::Forward, config, repository)
}

/// Run when the activation block is orphaned: restores the dataset's grant.
pub fn on_block_orphaned<R>(
    block: &Block,
    config: &AdjustmentConfig,
    repository: &mut R,
) -> Result<AdjustmentOutcome, AdjustmentError>
where
    R: AccountRepository + ?Sized,
{
    info!(
        "Orphaning blocks minted adjustment at block #{} ({} accounts)",
        block.height,
        config.dataset.len()
    );
    apply(Direction::Reverse, config, repository)
}
