use log::debug;

use super::DEFAULT_DIFFICULTY;
use super::hasher::hash_proof_guess;

/// How many candidates `solve_until` tries between abort checks.
pub const ABORT_POLL_INTERVAL: u64 = 1024;

/// Proof-of-work puzzle: find `p'` such that
/// `sha256("{p}{p'}{last_hash}")` starts with `difficulty` hex zeros.
#[derive(Debug, Clone, Copy)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn is_valid(&self, last_proof: u64, proof: u64, last_hash: &str) -> bool {
        hash_proof_guess(last_proof, proof, last_hash)
            .bytes()
            .take(self.difficulty)
            .all(|b| b == b'0')
    }

    /// First valid proof, scanning upward from 0.
    pub fn solve(&self, last_proof: u64, last_hash: &str) -> u64 {
        let mut proof = 0u64;
        while !self.is_valid(last_proof, proof, last_hash) {
            proof += 1;
        }
        proof
    }

    /// Same search as [`solve`](Self::solve), but gives up and returns `None`
    /// once `abort` reports true. `abort` is polled every
    /// [`ABORT_POLL_INTERVAL`] attempts.
    pub fn solve_until<F>(&self, last_proof: u64, last_hash: &str, abort: F) -> Option<u64>
    where
        F: Fn() -> bool,
    {
        let mut proof = 0u64;
        loop {
            if proof % ABORT_POLL_INTERVAL == 0 && abort() {
                debug!("proof search abandoned after {proof} attempts");
                return None;
            }
            if self.is_valid(last_proof, proof, last_hash) {
                debug!("proof {proof} found (difficulty={})", self.difficulty);
                return Some(proof);
            }
            proof += 1;
        }
    }
}
