use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::adjustment::{LevelThresholds, ThresholdError};

const BUNDLED_PARAMS: &str = include_str!("../../resources/blockchain-params.json");

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read blockchain params from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse blockchain params: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid cumulativeBlocksByLevel: {0}")]
    Thresholds(#[from] ThresholdError),
}

/// Network parameters consumed by the adjustment core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainParams {
    pub cumulative_blocks_by_level: Vec<u32>,
    /// Base-58 digest the dataset's sorted address set must hash to.
    pub blocks_minted_adjustment_hash: String,
    /// Height whose processing (and orphaning) runs the adjustment.
    pub blocks_minted_adjustment_height: u64,
}

impl BlockchainParams {
    /// Parse and check that the threshold table is usable.
    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_json::from_str(json)?;
        params.level_thresholds()?;
        Ok(params)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let params = Self::from_json_str(&json)?;
        debug!("Loaded blockchain params from {}", path.display());
        Ok(params)
    }

    /// Dev network parameters compiled into the binary.
    pub fn bundled() -> Result<Self, ParamsError> {
        Self::from_json_str(BUNDLED_PARAMS)
    }

    pub fn level_thresholds(&self) -> Result<LevelThresholds, ThresholdError> {
        LevelThresholds::new(self.cumulative_blocks_by_level.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustment::AdjustmentDataset;
    use crate::adjustment::digest::compute_digest;
    use std::io::Write;

    #[test]
    fn parses_camel_case() {
        let params = BlockchainParams::from_json_str(
            r#"{
                "cumulativeBlocksByLevel": [0, 100, 300, 700],
                "blocksMintedAdjustmentHash": "6UcLyoB84bwmKT7ziJu4aZgv9hhsBUndW7Kve73SGvEy",
                "blocksMintedAdjustmentHeight": 12
            }"#,
        )
        .unwrap();
        assert_eq!(params.blocks_minted_adjustment_height, 12);
        assert_eq!(params.level_thresholds().unwrap().max_level(), 3);
    }

    #[test]
    fn rejects_bad_threshold_table() {
        let err = BlockchainParams::from_json_str(
            r#"{
                "cumulativeBlocksByLevel": [1, 100],
                "blocksMintedAdjustmentHash": "x",
                "blocksMintedAdjustmentHeight": 1
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParamsError::Thresholds(ThresholdError::NonZeroBase(1))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"cumulativeBlocksByLevel":[0,5],"blocksMintedAdjustmentHash":"h","blocksMintedAdjustmentHeight":3}}"#
        )
        .unwrap();
        let params = BlockchainParams::load(file.path()).unwrap();
        assert_eq!(params.cumulative_blocks_by_level, vec![0, 5]);
    }

    #[test]
    fn bundled_hash_matches_bundled_dataset() {
        let params = BlockchainParams::bundled().unwrap();
        let dataset = AdjustmentDataset::bundled().unwrap();
        assert_eq!(
            compute_digest(dataset.addresses()).as_deref(),
            Some(params.blocks_minted_adjustment_hash.as_str())
        );
    }
}
