use log::{debug, info};
use serde_json::Number;

use super::consensus::is_chain_valid;
use super::{Block, MINING_REWARD, ProofOfWork, REWARD_SENDER};
use crate::transaction::Transaction;

/// The canonical chain plus the pool of transactions waiting for the next
/// block. Both live in one value so a single lock covers them.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    pow: ProofOfWork,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(ProofOfWork::default())
    }
}

impl Ledger {
    /// Start a ledger holding only the genesis block.
    pub fn new(pow: ProofOfWork) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            pow,
        }
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn pow(&self) -> &ProofOfWork {
        &self.pow
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Queue a transaction and return the index of the block that will
    /// carry it.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: Number,
    ) -> u64 {
        self.pending
            .push(Transaction::new(sender, recipient, amount));
        debug!("pending pool size now {}", self.pending.len());
        self.last_block().index + 1
    }

    /// Seal every pending transaction into a new block and append it.
    /// `previous_hash` defaults to the digest of the current tip.
    pub fn seal_block(&mut self, proof: u64, previous_hash: Option<&str>) -> &Block {
        let previous_hash = match previous_hash {
            Some(hash) => hash.to_string(),
            None => self.last_block().hash(),
        };
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(self.len() as u64 + 1, previous_hash, proof, transactions);
        info!(
            "sealed block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Record the reward for `miner` and seal the block in one step, so no
    /// transaction can slip in between.
    pub fn forge(&mut self, proof: u64, previous_hash: &str, miner: &str) -> &Block {
        self.new_transaction(REWARD_SENDER, miner, Number::from(MINING_REWARD));
        self.seal_block(proof, Some(previous_hash))
    }

    /// Full mining round on the calling thread: solve against the tip,
    /// reward `miner`, seal.
    pub fn mine(&mut self, miner: &str) -> &Block {
        let (last_proof, last_hash) = {
            let tip = self.last_block();
            (tip.proof, tip.hash())
        };
        let proof = self.pow.solve(last_proof, &last_hash);
        self.forge(proof, &last_hash, miner)
    }

    /// Swap in a chain the caller has already validated and compared.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        info!("replacing chain: {} -> {} blocks", self.len(), chain.len());
        self.chain = chain;
    }

    /// Validate the local chain with the same rules applied to peers.
    pub fn is_valid(&self) -> bool {
        is_chain_valid(&self.chain, &self.pow)
    }
}
