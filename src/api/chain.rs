use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, ChainResponse, ValidateResponse};

/// Get the full blockchain.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ChainResponse {
        chain: ledger.chain(),
        length: ledger.len(),
    })
}

/// Validate the local chain with the rules applied to peer chains.
#[get("/chain/validate")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ValidateResponse {
        valid: ledger.is_valid(),
        length: ledger.len(),
    })
}
