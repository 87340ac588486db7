pub mod applier;
pub mod dataset;
pub mod digest;
pub mod level;
pub mod record;
pub mod triggers;

use std::sync::Arc;
use thiserror::Error;

use crate::account::DataError;
use crate::blockchain::BlockchainParams;

pub use applier::{AdjustmentOutcome, AdjustmentReport, apply};
pub use dataset::{AdjustmentDataset, DatasetError};
pub use level::{LevelChange, LevelThresholds, ThresholdError, recalculate_level};
pub use record::{AdjustmentRecord, AdjustmentSet};
pub use triggers::{on_block_applied, on_block_orphaned};

/// Which way the dataset is applied.
///
/// The dataset describes a one-time grant: processing the activation block
/// removes it, orphaning that block puts it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub fn transform(self, delta: i32) -> i32 {
        match self {
            Direction::Forward => -delta,
            Direction::Reverse => delta,
        }
    }
}

#[derive(Debug, Error)]
pub enum AdjustmentError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("blocks minted adjustment digest mismatch: expected {expected}, computed {computed:?}")]
    DigestMismatch {
        expected: String,
        computed: Option<String>,
    },
}

/// Everything the applier needs, built once at startup and passed in.
#[derive(Debug, Clone)]
pub struct AdjustmentConfig {
    pub dataset: Arc<AdjustmentDataset>,
    pub expected_digest: String,
    pub thresholds: LevelThresholds,
    /// Escalate a digest mismatch to [`AdjustmentError::DigestMismatch`]
    /// instead of skipping the adjustment.
    pub strict_digest: bool,
}

impl AdjustmentConfig {
    pub fn new(
        dataset: Arc<AdjustmentDataset>,
        params: &BlockchainParams,
        strict_digest: bool,
    ) -> Result<Self, ThresholdError> {
        Ok(Self {
            dataset,
            expected_digest: params.blocks_minted_adjustment_hash.clone(),
            thresholds: params.level_thresholds()?,
            strict_digest,
        })
    }
}
