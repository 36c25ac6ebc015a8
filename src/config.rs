use clap::Parser;
use std::time::Duration;
use uuid::Uuid;

/// Proof-of-work ledger node.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Identity credited with mining rewards (random when omitted)
    #[arg(long, env = "NODE_ID")]
    pub node_id: Option<String>,

    /// Per-peer budget when fetching chains during consensus
    #[arg(long, env = "PEER_TIMEOUT_SECS", default_value_t = 5)]
    pub peer_timeout_secs: u64,
}

impl Config {
    pub fn node_id(&self) -> String {
        self.node_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use clap::Parser;

    #[test]
    fn defaults() {
        let cfg = Config::try_parse_from(["node"]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.peer_timeout_secs, 5);
        let id = cfg.node_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
    }

    #[test]
    fn short_port_flag() {
        let cfg = Config::try_parse_from(["node", "-p", "5001", "--node-id", "alice"]).unwrap();
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.node_id(), "alice");
    }
}
