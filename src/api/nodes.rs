use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::blockchain::resolve_conflicts;
use crate::error::NodeError;
use crate::network::peers::normalize_address;

/// Add peers. Every address is checked before any is stored.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse, NodeError> {
    let nodes = body
        .into_inner()
        .nodes
        .ok_or(NodeError::MissingField("nodes"))?;
    for node in &nodes {
        normalize_address(node)?;
    }

    let total_nodes = {
        let mut peers = state.peers.lock().expect("mutex poisoned");
        for node in &nodes {
            peers.register(node)?;
        }
        peers.to_vec()
    };

    Ok(HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        total_nodes,
    }))
}

/// Consensus: pull every peer's chain and adopt the longest valid one
/// that beats ours.
#[get("/nodes/resolve")]
pub async fn resolve(state: web::Data<AppState>) -> HttpResponse {
    let peers = state.peers.lock().expect("mutex poisoned").to_vec();
    let peer_chains = state.peer_client.fetch_all(peers).await;

    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    let replaced = resolve_conflicts(&mut ledger, &peer_chains);
    if replaced {
        state.bump_tip_epoch();
    }
    let chain = ledger.chain().to_vec();
    drop(ledger);

    info!(
        "consensus over {} reachable peer(s): {}",
        peer_chains.len(),
        if replaced { "replaced" } else { "kept local chain" }
    );

    HttpResponse::Ok().json(if replaced {
        ResolveResponse::Replaced {
            message: "Our chain was replaced",
            new_chain: chain,
        }
    } else {
        ResolveResponse::Authoritative {
            message: "Our chain is authoritative",
            chain,
        }
    })
}
