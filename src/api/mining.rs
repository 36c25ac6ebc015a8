use actix_web::{Error, HttpResponse, get, web};
use log::{debug, info};

use super::models::{AppState, MineResponse};

/// Mine a block from the pending pool:
/// - snapshot the tip, then search for a proof on the blocking pool
///   without holding the ledger lock
/// - restart if the tip moved while searching
/// - record the reward and seal under one lock acquisition
#[get("/mine")]
pub async fn mine(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    loop {
        let (last_proof, last_hash, pow, epoch) = {
            let ledger = state.ledger.lock().expect("mutex poisoned");
            let tip = ledger.last_block();
            (tip.proof, tip.hash(), *ledger.pow(), state.tip_epoch())
        };

        let worker = state.clone();
        let search_hash = last_hash.clone();
        let solved = web::block(move || {
            pow.solve_until(last_proof, &search_hash, || worker.tip_epoch() != epoch)
        })
        .await?;

        let Some(proof) = solved else {
            debug!("MINER - tip moved during search, restarting");
            continue;
        };

        let block = {
            let mut ledger = state.ledger.lock().expect("mutex poisoned");
            if state.tip_epoch() != epoch {
                debug!("MINER - tip moved before sealing, restarting");
                continue;
            }
            let block = ledger.forge(proof, &last_hash, &state.node_id).clone();
            state.bump_tip_epoch();
            block
        };

        info!(
            "MINER - forged block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        return Ok(HttpResponse::Ok().json(MineResponse {
            message: "New Block Forged",
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }));
    }
}
