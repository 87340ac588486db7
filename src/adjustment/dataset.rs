use log::{debug, error};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::record::AdjustmentRecord;

/// Logical name of the bundled dataset resource.
pub const BLOCKS_MINTED_ADJUSTMENT_SOURCE: &str = "blocks-minted-adjustment.json";

const BUNDLED_DATASET: &str = include_str!("../../resources/blocks-minted-adjustment.json");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read blocks minted adjustment from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse blocks minted adjustment: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("record {index} has an empty address")]
    EmptyAddress { index: usize },

    #[error("duplicate address {address} at record {index}")]
    DuplicateAddress { address: String, index: usize },

    #[error("adjustment for {address} cannot be negated ({delta})")]
    DeltaOutOfRange { address: String, delta: i32 },
}

/// The immutable list of per-account corrections, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentDataset {
    records: Vec<AdjustmentRecord>,
}

impl AdjustmentDataset {
    /// Validate records: addresses non-empty and unique, deltas negatable.
    pub fn from_records(records: Vec<AdjustmentRecord>) -> Result<Self, DatasetError> {
        validate(&records)?;
        Ok(Self { records })
    }

    /// Parse a flat JSON array of `{address, blocksMintedAdjustment}`.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let records: Vec<AdjustmentRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_json_str(&json).inspect_err(|e| {
            error!("Failed to load blocks minted adjustment {}: {e}", path.display());
        })?;
        debug!(
            "Loaded {} blocks minted adjustments from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// The dataset compiled into the binary.
    pub fn bundled() -> Result<Self, DatasetError> {
        let dataset = Self::from_json_str(BUNDLED_DATASET).inspect_err(|e| {
            error!("Failed to parse bundled {BLOCKS_MINTED_ADJUSTMENT_SOURCE}: {e}");
        })?;
        debug!(
            "Loaded {} blocks minted adjustments from bundled {}",
            dataset.len(),
            BLOCKS_MINTED_ADJUSTMENT_SOURCE
        );
        Ok(dataset)
    }

    pub fn records(&self) -> &[AdjustmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.address.as_str())
    }
}

fn validate(records: &[AdjustmentRecord]) -> Result<(), DatasetError> {
    let mut seen = HashSet::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if record.address.is_empty() {
            return Err(DatasetError::EmptyAddress { index });
        }
        if record.delta == i32::MIN {
            return Err(DatasetError::DeltaOutOfRange {
                address: record.address.clone(),
                delta: record.delta,
            });
        }
        if !seen.insert(record.address.as_str()) {
            return Err(DatasetError::DuplicateAddress {
                address: record.address.clone(),
                index,
            });
        }
    }
    Ok(())
}
