pub mod block;
pub mod consensus;
pub mod hasher;
pub mod ledger;
pub mod pow;

pub use block::Block;
pub use consensus::{PeerChain, is_chain_valid, resolve_conflicts};
pub use ledger::Ledger;
pub use pow::ProofOfWork;

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Proof stored in the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Sender recorded on the block reward transaction.
pub const REWARD_SENDER: &str = "SYSTEM";

/// Amount granted to the miner of each block.
pub const MINING_REWARD: u64 = 1;
