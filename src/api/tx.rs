use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};
use crate::error::NodeError;

/// Queue a transaction for the next mined block.
#[post("/transactions/new")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, NodeError> {
    let NewTxRequest {
        sender,
        recipient,
        amount,
    } = body.into_inner();
    let sender = required(sender, "sender")?;
    let recipient = required(recipient, "recipient")?;
    let amount = required(amount, "amount")?;

    let index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.new_transaction(sender, recipient, amount)
    };
    debug!("POST /transactions/new - queued for block {index}");

    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to Block {index}"),
        index,
    }))
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, NodeError> {
    value.ok_or_else(|| {
        warn!("POST /transactions/new - rejected: no {field}");
        NodeError::MissingField(field)
    })
}

/// List transactions waiting for the next block.
#[get("/transactions/pending")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending(),
    })
}
