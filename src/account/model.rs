use serde::{Deserialize, Serialize};

/// Persisted minting state of a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub address: String,
    pub blocks_minted: i32,
    /// Running correction total, mutated only by the adjustment applier.
    pub blocks_minted_adjustment: i32,
    pub blocks_minted_penalty: i32,
    pub level: u32,
}

impl AccountData {
    /// Fresh account with every counter at zero.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            blocks_minted: 0,
            blocks_minted_adjustment: 0,
            blocks_minted_penalty: 0,
            level: 0,
        }
    }

    /// `blocks_minted + blocks_minted_adjustment + blocks_minted_penalty`,
    /// widened so the sum itself can never overflow.
    pub fn effective_blocks_minted(&self) -> i64 {
        i64::from(self.blocks_minted)
            + i64::from(self.blocks_minted_adjustment)
            + i64::from(self.blocks_minted_penalty)
    }
}
