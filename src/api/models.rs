use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::blockchain::{Block, Ledger};
use crate::network::{PeerClient, PeerSet};
use crate::transaction::Transaction;

/// Node context shared by every handler. Built once in `main`.
pub struct AppState {
    /// Chain and pending pool behind one lock.
    pub ledger: Mutex<Ledger>,
    pub peers: Mutex<PeerSet>,
    /// Recipient of mining rewards.
    pub node_id: String,
    pub peer_client: PeerClient,
    /// Bumped (under the ledger lock) whenever the tip changes, so
    /// in-flight proof searches can notice they went stale.
    tip_epoch: AtomicU64,
}

impl AppState {
    pub fn new(ledger: Ledger, node_id: String, peer_client: PeerClient) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            peers: Mutex::new(PeerSet::new()),
            node_id,
            peer_client,
            tip_epoch: AtomicU64::new(0),
        }
    }

    pub fn tip_epoch(&self) -> u64 {
        self.tip_epoch.load(Ordering::Acquire)
    }

    pub fn bump_tip_epoch(&self) {
        self.tip_epoch.fetch_add(1, Ordering::AcqRel);
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- TX API Models ---------- */

/// Fields are optional so a missing one can be reported by name.
#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<Number>,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Replaced {
        message: &'static str,
        new_chain: Vec<Block>,
    },
    Authoritative {
        message: &'static str,
        chain: Vec<Block>,
    },
}
