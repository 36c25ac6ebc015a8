use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Failures surfaced to API callers.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("invalid peer address: {0:?}")]
    InvalidAddress(String),
    #[error("Missing values: {0}")]
    MissingField(&'static str),
}

impl ResponseError for NodeError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

/// Why a peer's chain could not be fetched. Never propagated past conflict
/// resolution: the peer is just skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("bad peer uri: {0}")]
    Uri(#[from] hyper::http::uri::InvalidUri),
    #[error("http: {0}")]
    Http(#[from] hyper::Error),
    #[error("peer answered {0}")]
    Status(hyper::StatusCode),
    #[error("undecodable chain: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
}
