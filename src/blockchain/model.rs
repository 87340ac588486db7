use log::{debug, warn};
use thiserror::Error;

use super::Block;
use crate::account::AccountRepository;
use crate::adjustment::{
    AdjustmentConfig, AdjustmentError, AdjustmentOutcome, on_block_applied, on_block_orphaned,
};

#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("cannot orphan the genesis block")]
    OrphanGenesis,

    #[error("block #{height} rejected: {source}")]
    Adjustment {
        height: u64,
        #[source]
        source: AdjustmentError,
    },
}

/// In-memory chain that runs the blocks minted adjustment when the
/// activation height is processed or orphaned.
///
/// Block transitions take `&mut self`, so one block moves at a time.
#[derive(Debug)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    adjustment_height: u64,
    adjustment: AdjustmentConfig,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(adjustment_height: u64, adjustment: AdjustmentConfig) -> Self {
        Self {
            chain: vec![Block::genesis()],
            adjustment_height,
            adjustment,
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    pub fn height(&self) -> u64 {
        self.last_block().height
    }

    pub fn adjustment_height(&self) -> u64 {
        self.adjustment_height
    }

    /// Build and process the next block. The block is only appended once the
    /// adjustment (if due) has succeeded.
    pub fn process_block<R>(
        &mut self,
        repository: &mut R,
    ) -> Result<(&Block, Option<AdjustmentOutcome>), BlockchainError>
    where
        R: AccountRepository + ?Sized,
    {
        let block = Block::new(self.height() + 1, self.last_block().hash.clone());

        let outcome = if block.height == self.adjustment_height {
            let outcome = on_block_applied(&block, &self.adjustment, repository).map_err(
                |source| BlockchainError::Adjustment {
                    height: block.height,
                    source,
                },
            )?;
            if !outcome.is_applied() {
                warn!("Block #{} processed without blocks minted adjustment", block.height);
            }
            Some(outcome)
        } else {
            None
        };

        debug!("Processed block #{} (hash={})", block.height, block.hash);
        self.chain.push(block);
        Ok((self.last_block(), outcome))
    }

    /// Orphan the tip, reversing the adjustment if the tip is the activation
    /// block. The block stays on the chain if the reversal fails.
    pub fn orphan_block<R>(
        &mut self,
        repository: &mut R,
    ) -> Result<(Block, Option<AdjustmentOutcome>), BlockchainError>
    where
        R: AccountRepository + ?Sized,
    {
        if self.chain.len() <= 1 {
            return Err(BlockchainError::OrphanGenesis);
        }

        let tip = self.last_block();
        let outcome = if tip.height == self.adjustment_height {
            let outcome = on_block_orphaned(tip, &self.adjustment, repository).map_err(
                |source| BlockchainError::Adjustment {
                    height: tip.height,
                    source,
                },
            )?;
            if !outcome.is_applied() {
                warn!("Block #{} orphaned without blocks minted adjustment", tip.height);
            }
            Some(outcome)
        } else {
            None
        };

        let Some(block) = self.chain.pop() else {
            return Err(BlockchainError::OrphanGenesis);
        };
        debug!("Orphaned block #{} (hash={})", block.height, block.hash);
        Ok((block, outcome))
    }
}
