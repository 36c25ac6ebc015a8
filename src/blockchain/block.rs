use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hasher::hash_block;
use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A sealed block. Fields are declared in canonical (sorted) order because
/// the hasher serializes them as declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain (genesis is 1).
    pub index: u64,
    pub previous_hash: String,
    /// Proof-of-work solution relative to the previous block.
    pub proof: u64,
    /// Seconds since the Unix epoch, sub-second precision.
    pub timestamp: f64,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// The fixed first block of every chain.
    pub fn genesis() -> Self {
        Self::new(
            1,
            GENESIS_PREVIOUS_HASH.to_string(),
            GENESIS_PROOF,
            Vec::new(),
        )
    }

    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        previous_hash: String,
        proof: u64,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            index,
            previous_hash,
            proof,
            timestamp: now_secs(),
            transactions,
        }
    }

    pub fn hash(&self) -> String {
        hash_block(self)
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::transaction::Transaction;
    use serde_json::Number;

    #[test]
    fn genesis_is_fixed() {
        let b = Block::genesis();
        assert_eq!(b.index, 1);
        assert_eq!(b.proof, 100);
        assert_eq!(b.previous_hash, "1");
        assert!(b.transactions.is_empty());
        assert!(b.timestamp > 0.0);
    }

    #[test]
    fn hash_tracks_content() {
        let b = Block::new(2, "prev".into(), 7, vec![Transaction::new("a", "b", Number::from(1))]);
        let old_hash = b.hash();
        assert_eq!(old_hash, b.hash());

        let mut tampered = b.clone();
        tampered
            .transactions
            .push(Transaction::new("x", "y", Number::from(1)));
        assert_ne!(old_hash, tampered.hash());
    }

    #[test]
    fn decodes_peer_json() {
        let raw = r#"{"index": 1, "previous_hash": "1", "proof": 100, "timestamp": 1690000000.25, "transactions": []}"#;
        let b: Block = serde_json::from_str(raw).unwrap();
        assert_eq!(b.timestamp, 1_690_000_000.25);
        assert_eq!(super::super::hasher::canonical_json(&b), raw);
    }
}
