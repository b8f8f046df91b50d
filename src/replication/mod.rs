use crate::election::Node;
use crate::primitives::Bitset;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Per-validator delivery assignment for one storage class: `rows[i]` is
/// the set of storage-node column indices validator `i` is responsible
/// for replicating to. Built so each storage node is owned by exactly
/// one validator, keeping fan-out linear in `storage_nodes.len()`
/// instead of quadratic in `validators.len() * storage_nodes.len()`.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct ReplicationTree {
  pub chain: Vec<Bitset>,
  pub beacon: Vec<Bitset>,
  pub io: Vec<Bitset>,
}

/// Hamming distance between two public keys' wire bytes: a cheap,
/// deterministic notion of "closeness" with no topology information
/// available, used only to spread load rather than to model real
/// network proximity.
fn key_distance(a: &crate::primitives::PublicKey, b: &crate::primitives::PublicKey) -> u32 {
  a.as_bytes().iter().zip(b.as_bytes().iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// Assigns each storage node in `storage_nodes` to exactly one row in
/// `validators`: the nearest validator in key-space that still has
/// spare capacity under `ceil(storage_nodes.len() / validators.len())`.
/// Capacity-gating guarantees row cardinalities land within one of each
/// other by construction, with distance breaking ties among validators
/// that still have room.
fn assign(validators: &[Node], storage_nodes: &[Node]) -> Vec<Bitset> {
  if validators.is_empty() {
    return vec![];
  }
  let mut rows = vec![Bitset::zeros(storage_nodes.len()); validators.len()];
  let capacity = (storage_nodes.len() + validators.len() - 1) / validators.len();
  let mut row_load = vec![0usize; validators.len()];
  for (col, storage) in storage_nodes.iter().enumerate() {
    let best = validators
      .iter()
      .enumerate()
      .filter(|(i, _)| row_load[*i] < capacity)
      .min_by_key(|(i, v)| key_distance(&v.public_key, &storage.public_key))
      .map(|(i, _)| i)
      .expect("capacity * validators.len() >= storage_nodes.len(), so room always remains");
    rows[best].set(col, true);
    row_load[best] += 1;
  }
  rows
}

/// Builds the three per-class replication trees for a validator
/// committee, one row per validator and one column per storage node in
/// each of the chain/beacon/io storage sets.
pub fn build_replication_tree(
  validators: &[Node],
  chain_storage: &[Node],
  beacon_storage: &[Node],
  io_storage: &[Node],
) -> ReplicationTree {
  ReplicationTree {
    chain: assign(validators, chain_storage),
    beacon: assign(validators, beacon_storage),
    io: assign(validators, io_storage),
  }
}

/// Column sanity check: every storage node is owned by exactly one row.
/// Used in tests and as a cheap runtime assertion when a freshly built
/// tree is handed to the replication phase.
pub fn each_column_owned_once(rows: &[Bitset]) -> bool {
  let Some(len) = rows.first().map(Bitset::len) else { return true };
  (0..len).all(|col| rows.iter().filter(|r| r.get(col)).count() == 1)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{Keypair, OriginId, Timestamp};
  use std::net::{IpAddr, Ipv4Addr};

  fn node(seed: u8, patch: &str) -> Node {
    let pk = Keypair::from_seed(&[seed; 32], OriginId::Software).public();
    Node::new(pk, Timestamp::from_micros(0), patch, IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 3000 + seed as u16)
  }

  #[test]
  fn every_storage_node_is_owned_by_exactly_one_validator() {
    let validators: Vec<Node> = (1..=4u8).map(|i| node(i, "eu")).collect();
    let storage: Vec<Node> = (10..=20u8).map(|i| node(i, "eu")).collect();
    let tree = build_replication_tree(&validators, &storage, &[], &[]);
    assert!(each_column_owned_once(&tree.chain));
    assert_eq!(tree.chain.len(), validators.len());
  }

  #[test]
  fn row_loads_are_balanced_within_one() {
    let validators: Vec<Node> = (1..=3u8).map(|i| node(i, "eu")).collect();
    let storage: Vec<Node> = (10..=21u8).map(|i| node(i, "eu")).collect();
    let tree = build_replication_tree(&validators, &storage, &[], &[]);
    let loads: Vec<usize> = tree.chain.iter().map(|r| r.count_ones()).collect();
    let (min, max) = (loads.iter().min().unwrap(), loads.iter().max().unwrap());
    assert!(max - min <= 1, "loads not balanced: {loads:?}");
  }

  #[test]
  fn empty_validator_set_yields_no_rows() {
    let storage: Vec<Node> = (10..=12u8).map(|i| node(i, "eu")).collect();
    let tree = build_replication_tree(&[], &storage, &[], &[]);
    assert!(tree.chain.is_empty());
  }
}
