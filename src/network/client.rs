use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::{Client, StatusCode, Uri};
use log::{debug, warn};
use tokio::task::JoinSet;

use crate::blockchain::PeerChain;
use crate::error::FetchError;

/// Default per-peer budget for fetching a chain.
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Pulls chains from peers over HTTP (`GET http://{peer}/chain`).
#[derive(Clone)]
pub struct PeerClient {
    http: Client<HttpConnector>,
    timeout: Duration,
}

impl Default for PeerClient {
    fn default() -> Self {
        Self::new(DEFAULT_PEER_TIMEOUT)
    }
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            timeout,
        }
    }

    /// Fetch one peer's chain, bounded by the client timeout.
    pub async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, FetchError> {
        tokio::time::timeout(self.timeout, self.request_chain(peer))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
    }

    async fn request_chain(&self, peer: &str) -> Result<PeerChain, FetchError> {
        let uri: Uri = format!("http://{peer}/chain").parse()?;
        let resp = self.http.get(uri).await?;
        if resp.status() != StatusCode::OK {
            return Err(FetchError::Status(resp.status()));
        }
        let body = hyper::body::to_bytes(resp.into_body()).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch every peer concurrently. Peers that fail are logged and left
    /// out; the rest come back in the order given.
    pub async fn fetch_all<I>(&self, peers: I) -> Vec<(String, PeerChain)>
    where
        I: IntoIterator<Item = String>,
    {
        let mut tasks = JoinSet::new();
        for (order, peer) in peers.into_iter().enumerate() {
            let client = self.clone();
            tasks.spawn(async move {
                let result = client.fetch_chain(&peer).await;
                (order, peer, result)
            });
        }

        let mut fetched = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((order, peer, Ok(chain))) => {
                    debug!("peer {peer} advertised {} blocks", chain.length);
                    fetched.push((order, peer, chain));
                }
                Ok((_, peer, Err(e))) => warn!("skipping peer {peer}: {e}"),
                Err(e) => warn!("peer fetch task failed: {e}"),
            }
        }

        fetched.sort_by_key(|(order, _, _)| *order);
        fetched
            .into_iter()
            .map(|(_, peer, chain)| (peer, chain))
            .collect()
    }
}
