pub mod node;
pub mod seed;

pub use node::Node;

use crate::primitives::Digest;
use crate::transaction::Transaction;

/// Tunables for committee and storage-set sizing.
#[derive(Debug, Clone)]
pub struct ElectionConstraints {
  pub min_validators: usize,
  pub chain_replication_factor: usize,
  pub beacon_replication_factor: usize,
  pub io_replication_factor: usize,
}

impl Default for ElectionConstraints {
  fn default() -> Self {
    Self {
      min_validators: 3,
      chain_replication_factor: 3,
      beacon_replication_factor: 2,
      io_replication_factor: 2,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ElectionResult {
  pub validation_committee: Vec<Node>,
  pub chain_storage: Vec<Node>,
  pub beacon_storage: Vec<Node>,
  pub io_storage: Vec<Node>,
}

/// `K = min(max(ceil(log2(|authorized|)), min_validators), |authorized|)`.
/// Degenerates to 1 in genesis-scale networks because the outer `min`
/// caps it at the roster size.
pub fn committee_size(authorized_count: usize, min_validators: usize) -> usize {
  if authorized_count == 0 {
    return 0;
  }
  let log2_ceil = (usize::BITS - (authorized_count.max(1) - 1).leading_zeros()) as usize;
  log2_ceil.max(min_validators).min(authorized_count)
}

fn rendezvous_rank<'a>(candidates: &'a [Node], seed: &Digest) -> Vec<(&'a Node, Digest)> {
  let mut scored: Vec<(&Node, Digest)> =
    candidates.iter().map(|n| (n, seed::score(&n.public_key, seed))).collect();
  scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.public_key.to_b58().cmp(&b.0.public_key.to_b58())));
  scored
}

/// Picks the first `k` nodes by rendezvous score, then runs one
/// diversification pass: a duplicate-patch member in the selected set is
/// swapped for the next unselected candidate that introduces a new patch,
/// provided one exists: a deterministic stand-in for "diversify by
/// geographic patch where possible", a no-op when the top `k` are
/// already maximally diverse.
fn select_diversified(ranked: &[(&Node, Digest)], k: usize) -> Vec<Node> {
  if k == 0 || ranked.is_empty() {
    return vec![];
  }
  let k = k.min(ranked.len());
  let mut selected: Vec<usize> = (0..k).collect();

  loop {
    let mut seen = std::collections::HashSet::new();
    let mut duplicate_pos = None;
    for (pos, idx) in selected.iter().enumerate() {
      if !seen.insert(&ranked[*idx].0.geo_patch) {
        duplicate_pos = Some(pos);
      }
    }
    let Some(dup_pos) = duplicate_pos else { break };

    let used_patches: std::collections::HashSet<&String> =
      selected.iter().map(|i| &ranked[*i].0.geo_patch).collect();
    let replacement = (k..ranked.len())
      .find(|i| !selected.contains(i) && !used_patches.contains(&ranked[*i].0.geo_patch));

    match replacement {
      Some(new_idx) => selected[dup_pos] = new_idx,
      None => break,
    }
  }

  selected.sort_unstable();
  selected.into_iter().map(|i| ranked[i].0.clone()).collect()
}

/// Elects the validation committee: `[coordinator, cross_1, ..., cross_{N-1}]`,
/// ordered by ascending rendezvous score.
pub fn elect_validation_committee(
  tx: &Transaction,
  roster: &[Node],
  daily_nonce_seed: &[u8],
  constraints: &ElectionConstraints,
) -> Vec<Node> {
  let eligible: Vec<Node> =
    roster.iter().filter(|n| n.authorization_date < tx.timestamp).cloned().collect();
  if eligible.is_empty() {
    return vec![];
  }
  let seed = seed::sorting_seed(tx, daily_nonce_seed);
  let ranked = rendezvous_rank(&eligible, &seed);
  let k = committee_size(eligible.len(), constraints.min_validators);
  select_diversified(&ranked, k)
}

/// Elects a storage set of the given replication factor using a seed
/// distinct from the committee's daily nonce, so storage placement and
/// validator committee can't be derived from one another.
pub fn elect_storage_nodes(
  tx: &Transaction,
  roster: &[Node],
  storage_nonce_seed: &[u8],
  replication_factor: usize,
) -> Vec<Node> {
  if roster.is_empty() {
    return vec![];
  }
  let seed = seed::sorting_seed(tx, storage_nonce_seed);
  let ranked = rendezvous_rank(roster, &seed);
  select_diversified(&ranked, replication_factor.min(roster.len()))
}

/// Runs the whole election.
pub fn elect(
  tx: &Transaction,
  roster: &[Node],
  daily_nonce_seed: &[u8],
  storage_nonce_seed: &[u8],
  constraints: &ElectionConstraints,
) -> ElectionResult {
  ElectionResult {
    validation_committee: elect_validation_committee(tx, roster, daily_nonce_seed, constraints),
    chain_storage: elect_storage_nodes(tx, roster, storage_nonce_seed, constraints.chain_replication_factor),
    beacon_storage: elect_storage_nodes(tx, roster, storage_nonce_seed, constraints.beacon_replication_factor),
    io_storage: elect_storage_nodes(tx, roster, storage_nonce_seed, constraints.io_replication_factor),
  }
}

/// Re-derives the committee from the public keys an incoming
/// `StartMining` claims, to reject stale or forged elections.
pub fn is_valid_election(
  tx: &Transaction,
  claimed: &[crate::primitives::PublicKey],
  roster: &[Node],
  daily_nonce_seed: &[u8],
  constraints: &ElectionConstraints,
) -> bool {
  let expected = elect_validation_committee(tx, roster, daily_nonce_seed, constraints);
  expected.len() == claimed.len()
    && expected.iter().zip(claimed.iter()).all(|(n, pk)| &n.public_key == pk)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{HashAlgo, Keypair, OriginId, Timestamp};
  use crate::transaction::test_support::build_transfer;
  use crate::transaction::Transaction;
  use std::net::{IpAddr, Ipv4Addr};

  fn node(seed: u8, patch: &str, auth_before: i64) -> Node {
    let kp = Keypair::from_seed(&[seed; 32], OriginId::Software);
    Node::new(
      kp.public(),
      Timestamp::from_micros(auth_before),
      patch,
      IpAddr::V4(Ipv4Addr::new(127, 0, 0, seed)),
      9000 + seed as u16,
    )
  }

  fn sample_tx() -> Transaction {
    let previous = Keypair::from_seed(&[100u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[101u8; 32], OriginId::OnChain);
    let recipient = crate::primitives::Address::from_public_key(
      &Keypair::from_seed(&[102u8; 32], OriginId::Software).public(),
      HashAlgo::Sha3_256,
    );
    build_transfer(&previous, &origin, recipient, 10)
  }

  #[test]
  fn election_is_deterministic() {
    let tx = sample_tx();
    let roster: Vec<Node> =
      (1..=6).map(|i| node(i, if i % 2 == 0 { "EU" } else { "US" }, 0)).collect();
    let constraints = ElectionConstraints::default();
    let r1 = elect_validation_committee(&tx, &roster, b"daily-nonce", &constraints);
    let r2 = elect_validation_committee(&tx, &roster, b"daily-nonce", &constraints);
    assert_eq!(
      r1.iter().map(|n| n.public_key).collect::<Vec<_>>(),
      r2.iter().map(|n| n.public_key).collect::<Vec<_>>()
    );
    assert!(r1.len() >= constraints.min_validators.min(roster.len()));
  }

  #[test]
  fn single_node_network_degenerates_to_one() {
    let tx = sample_tx();
    let roster = vec![node(1, "US", 0)];
    let committee =
      elect_validation_committee(&tx, &roster, b"seed", &ElectionConstraints::default());
    assert_eq!(committee.len(), 1);
  }

  #[test]
  fn excludes_nodes_authorized_after_tx_timestamp() {
    let tx = sample_tx();
    let future = tx.timestamp.as_micros() + 1_000_000;
    let roster = vec![node(1, "US", 0), node(2, "EU", future)];
    let committee =
      elect_validation_committee(&tx, &roster, b"seed", &ElectionConstraints::default());
    assert_eq!(committee.len(), 1);
    assert_eq!(committee[0].public_key, roster[0].public_key);
  }

  #[test]
  fn committee_size_formula() {
    assert_eq!(committee_size(1, 3), 1);
    assert_eq!(committee_size(2, 3), 2);
    assert_eq!(committee_size(8, 3), 3);
    assert_eq!(committee_size(20, 3), 5);
  }
}
