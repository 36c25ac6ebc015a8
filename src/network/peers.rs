use std::collections::BTreeSet;

use log::info;

use crate::error::NodeError;

/// Addresses (`host:port`) of the nodes consulted during conflict
/// resolution. Deduplicated and kept sorted.
#[derive(Debug, Default, Clone)]
pub struct PeerSet {
    nodes: BTreeSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and add an address. Returns true if it was new.
    pub fn register(&mut self, address: &str) -> Result<bool, NodeError> {
        let node = normalize_address(address)?;
        let added = self.nodes.insert(node.clone());
        if added {
            info!("registered peer {node}");
        }
        Ok(added)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }
}

/// Reduce an address to the part used to reach the peer.
///
/// `http://10.0.0.5:5000/x` and `//10.0.0.5:5000` keep the network location
/// (`10.0.0.5:5000`). Without a scheme the address is taken as given, minus
/// any query or fragment. Fails when nothing usable remains.
pub fn normalize_address(address: &str) -> Result<String, NodeError> {
    let address = address.trim();
    let without_suffix = address
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let after_scheme = match without_suffix.find("://") {
        Some(pos) if is_scheme(&without_suffix[..pos]) => Some(&without_suffix[pos + 3..]),
        _ => without_suffix.strip_prefix("//"),
    };

    let normalized = match after_scheme {
        Some(rest) => {
            let (netloc, path) = match rest.find('/') {
                Some(pos) => rest.split_at(pos),
                None => (rest, ""),
            };
            if netloc.is_empty() { path } else { netloc }
        }
        None => without_suffix,
    };

    if normalized.is_empty() {
        return Err(NodeError::InvalidAddress(address.to_string()));
    }
    Ok(normalized.to_string())
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_network_location_of_full_urls() {
        assert_eq!(normalize_address("http://192.168.0.5:5000").unwrap(), "192.168.0.5:5000");
        assert_eq!(normalize_address("https://node.example:80/chain?x=1").unwrap(), "node.example:80");
        assert_eq!(normalize_address("//10.0.0.1:5001").unwrap(), "10.0.0.1:5001");
    }

    #[test]
    fn accepts_bare_host_port() {
        assert_eq!(normalize_address("192.168.0.5:5000").unwrap(), "192.168.0.5:5000");
        assert_eq!(normalize_address(" localhost:5001 ").unwrap(), "localhost:5001");
    }

    #[test]
    fn falls_back_to_path_when_netloc_is_empty() {
        assert_eq!(normalize_address("http:///only-path").unwrap(), "/only-path");
    }

    #[test]
    fn rejects_addresses_without_location_or_path() {
        for bad in ["", "   ", "http://", "//", "?q=1", "#frag"] {
            assert!(
                matches!(normalize_address(bad), Err(NodeError::InvalidAddress(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn register_deduplicates_across_forms() {
        let mut peers = PeerSet::new();
        assert!(peers.register("http://127.0.0.1:5001").unwrap());
        assert!(!peers.register("127.0.0.1:5001").unwrap());
        assert!(peers.register("127.0.0.1:5002").unwrap());
        assert!(peers.register("http://").is_err());
        assert_eq!(peers.to_vec(), vec!["127.0.0.1:5001", "127.0.0.1:5002"]);
    }
}
