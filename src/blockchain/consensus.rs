use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{Block, Ledger, ProofOfWork};

/// A chain as advertised by a peer's `/chain` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Check index sequence, linkage and proof-of-work of every consecutive
/// pair. A genesis-only chain is valid; an empty one is not.
pub fn is_chain_valid(chain: &[Block], pow: &ProofOfWork) -> bool {
    if chain.is_empty() {
        return false;
    }

    for pair in chain.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        if current.index != prev.index + 1 {
            debug!("block #{} follows block #{}", current.index, prev.index);
            return false;
        }

        let prev_hash = prev.hash();

        if current.previous_hash != prev_hash {
            debug!("block #{} does not link to its predecessor", current.index);
            return false;
        }

        if !pow.is_valid(prev.proof, current.proof, &prev_hash) {
            debug!("block #{} carries an invalid proof", current.index);
            return false;
        }
    }

    true
}

/// Pick the longest valid candidate that is strictly longer than
/// `local_len`. Among equal lengths the first one seen wins. A candidate
/// whose advertised `length` disagrees with the chain it sent is ignored.
pub fn select_longest<'a, I>(
    local_len: usize,
    candidates: I,
    pow: &ProofOfWork,
) -> Option<(&'a str, &'a [Block])>
where
    I: IntoIterator<Item = (&'a str, &'a PeerChain)>,
{
    let mut max_length = local_len;
    let mut best = None;

    for (peer, candidate) in candidates {
        if candidate.length != candidate.chain.len() {
            debug!(
                "peer {peer} advertised {} blocks but sent {}",
                candidate.length,
                candidate.chain.len()
            );
            continue;
        }
        if candidate.length > max_length && is_chain_valid(&candidate.chain, pow) {
            max_length = candidate.length;
            best = Some((peer, candidate.chain.as_slice()));
        } else {
            debug!(
                "peer {peer} not adopted (length {} vs {max_length})",
                candidate.length
            );
        }
    }

    best
}

/// Longest-valid-chain rule. Replaces the ledger's chain with the best
/// peer chain and returns true, or leaves it untouched and returns false.
/// Blocks dropped from the local chain are not re-queued.
pub fn resolve_conflicts(ledger: &mut Ledger, peer_chains: &[(String, PeerChain)]) -> bool {
    let pow = *ledger.pow();
    let selected = select_longest(
        ledger.len(),
        peer_chains.iter().map(|(peer, chain)| (peer.as_str(), chain)),
        &pow,
    );

    match selected {
        Some((peer, chain)) => {
            info!("adopting chain of {} blocks from {peer}", chain.len());
            ledger.replace_chain(chain.to_vec());
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    fn pow() -> ProofOfWork {
        ProofOfWork::new(2)
    }

    fn mined(blocks: usize) -> Ledger {
        let mut ledger = Ledger::new(pow());
        while ledger.len() < blocks {
            ledger.new_transaction("a", "b", Number::from(ledger.len()));
            ledger.mine("miner");
        }
        ledger
    }

    fn advertised(ledger: &Ledger) -> PeerChain {
        PeerChain {
            chain: ledger.chain().to_vec(),
            length: ledger.len(),
        }
    }

    #[test]
    fn genesis_only_is_valid() {
        assert!(is_chain_valid(Ledger::new(pow()).chain(), &pow()));
        assert!(!is_chain_valid(&[], &pow()));
    }

    #[test]
    fn honestly_mined_chain_is_valid() {
        assert!(is_chain_valid(mined(5).chain(), &pow()));
    }

    #[test]
    fn altered_previous_hash_is_rejected() {
        let mut chain = mined(4).chain().to_vec();
        chain[2].previous_hash = "0".repeat(64);
        assert!(!is_chain_valid(&chain, &pow()));
    }

    #[test]
    fn altered_transaction_breaks_link() {
        let mut chain = mined(4).chain().to_vec();
        chain[1].transactions[0].amount = Number::from(1_000_000);
        assert!(!is_chain_valid(&chain, &pow()));
    }

    #[test]
    fn tampered_proof_is_rejected_and_not_adopted() {
        let pow = pow();
        let honest = mined(4);
        let mut chain = honest.chain().to_vec();
        // Index 2 in 0-based terms; pick a proof the puzzle rejects.
        let last_hash = chain[1].hash();
        let bad = (0..)
            .find(|p| !pow.is_valid(chain[1].proof, *p, &last_hash))
            .unwrap();
        chain[2].proof = bad;
        // keep the successor's link consistent so only the proof is wrong
        chain[3].previous_hash = chain[2].hash();
        assert!(!is_chain_valid(&chain, &pow));

        let mut local = Ledger::new(pow);
        let before = local.chain().to_vec();
        let peers = vec![(
            "peer".to_string(),
            PeerChain {
                length: chain.len(),
                chain,
            },
        )];
        assert!(!resolve_conflicts(&mut local, &peers));
        assert_eq!(local.chain(), before.as_slice());
    }

    #[test]
    fn longer_valid_peer_chain_replaces_local() {
        let mut local = mined(3);
        let peer = mined(4);
        let peers = vec![("b:5000".to_string(), advertised(&peer))];

        assert!(resolve_conflicts(&mut local, &peers));
        assert_eq!(local.chain(), peer.chain());
    }

    #[test]
    fn equal_or_shorter_chains_never_replace() {
        let mut local = mined(3);
        let before = local.chain().to_vec();
        let peers = vec![
            ("same".to_string(), advertised(&mined(3))),
            ("short".to_string(), advertised(&mined(2))),
        ];
        assert!(!resolve_conflicts(&mut local, &peers));
        assert_eq!(local.chain(), before.as_slice());
    }

    #[test]
    fn misreported_length_never_shrinks_chain() {
        let mut local = mined(4);
        let before = local.chain().to_vec();
        let short = mined(2);
        let peers = vec![(
            "liar".to_string(),
            PeerChain {
                chain: short.chain().to_vec(),
                length: 100,
            },
        )];
        assert!(!resolve_conflicts(&mut local, &peers));
        assert_eq!(local.chain(), before.as_slice());
    }

    #[test]
    fn understated_length_is_ignored_too() {
        let mut local = mined(2);
        let longer = mined(4);
        let peers = vec![(
            "modest".to_string(),
            PeerChain {
                chain: longer.chain().to_vec(),
                length: 3,
            },
        )];
        assert!(!resolve_conflicts(&mut local, &peers));
        assert_eq!(local.len(), 2);
    }

    #[test]
    fn index_gaps_are_rejected() {
        let pow = pow();
        let mut chain = mined(3).chain().to_vec();
        chain[2].index = 7;
        assert!(!is_chain_valid(&chain, &pow));

        let mut repeated = mined(3).chain().to_vec();
        repeated[2].index = repeated[1].index;
        assert!(!is_chain_valid(&repeated, &pow));

        let mut local = Ledger::new(pow);
        let peers = vec![(
            "gappy".to_string(),
            PeerChain {
                length: chain.len(),
                chain,
            },
        )];
        assert!(!resolve_conflicts(&mut local, &peers));
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn longest_among_several_wins_and_first_tie_is_kept() {
        let four_a = mined(4);
        let four_b = mined(4);
        let five = mined(5);
        let peers = vec![
            ("a".to_string(), advertised(&four_a)),
            ("five".to_string(), advertised(&five)),
            ("b".to_string(), advertised(&four_b)),
        ];
        let picked = select_longest(1, peers.iter().map(|(p, c)| (p.as_str(), c)), &pow());
        assert_eq!(picked.map(|(p, _)| p), Some("five"));

        let ties = vec![
            ("a".to_string(), advertised(&four_a)),
            ("b".to_string(), advertised(&four_b)),
        ];
        let picked = select_longest(1, ties.iter().map(|(p, c)| (p.as_str(), c)), &pow());
        assert_eq!(picked.map(|(p, _)| p), Some("a"));
    }

    #[test]
    fn invalid_longer_chain_does_not_hide_valid_one() {
        let mut local = mined(2);
        let mut forged = mined(6).chain().to_vec();
        forged[3].previous_hash = "bogus".into();
        let valid = mined(4);
        let peers = vec![
            (
                "forged".to_string(),
                PeerChain {
                    length: forged.len(),
                    chain: forged,
                },
            ),
            ("valid".to_string(), advertised(&valid)),
        ];
        assert!(resolve_conflicts(&mut local, &peers));
        assert_eq!(local.len(), 4);
    }
}
