use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A block header as seen by the adjustment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub previous_hash: String,
    pub hash: String, // Cached hash of the block
}

impl Block {
    /// Create the genesis block (height 0).
    pub fn genesis() -> Self {
        Self::new(0, String::from("0"))
    }

    pub fn new(height: u64, previous_hash: String) -> Self {
        let mut block = Self {
            height,
            timestamp: Utc::now().timestamp(),
            previous_hash,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// SHA-256 over the block's fields (excluding `hash` itself), hex encoded.
    pub fn compute_hash(&self) -> String {
        let preimage = format!("{}:{}:{}", self.height, self.timestamp, self.previous_hash);
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::Block;

    #[test]
    fn genesis_has_valid_hash() {
        let b = Block::genesis();
        assert_eq!(b.height, 0);
        assert_eq!(b.hash, b.compute_hash());
        assert_eq!(b.hash.len(), 64);
    }

    #[test]
    fn hash_changes_when_mutated() {
        let mut b = Block::new(3, "prev".into());
        let old_hash = b.hash.clone();
        b.previous_hash = "other".into();
        assert_ne!(old_hash, b.compute_hash());
    }
}
