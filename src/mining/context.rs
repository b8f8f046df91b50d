use crate::primitives::{Bitset, PublicKey};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Sent by every committee member to the coordinator (and, so the
/// node-responsiveness fallback can take over deterministically, to the
/// rest of the committee too): this validator's view of who else is
/// reachable, plus the storage nodes of the transaction's *previous*
/// chain entry the coordinator will need to fetch prior UTXOs from.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct MiningContext {
  pub validation_node_public_key: PublicKey,
  pub previous_storage_nodes_keys: Vec<PublicKey>,
  pub cross_validation_nodes_view: Bitset,
  pub chain_storage_nodes_view: Bitset,
  pub beacon_storage_nodes_view: Bitset,
  pub io_storage_nodes_view: Bitset,
}

/// The coordinator's merge of every collected [`MiningContext`]: a
/// conservative (AND) view per storage class, plus the union of
/// previous-storage-node keys any context reported (the coordinator
/// only needs one live reply to fetch prior UTXOs from).
#[derive(Debug, Clone, Default)]
pub struct AggregatedContext {
  pub previous_storage_nodes_keys: Vec<PublicKey>,
  pub cross_validation_nodes_view: Option<Bitset>,
  pub chain_storage_nodes_view: Option<Bitset>,
  pub beacon_storage_nodes_view: Option<Bitset>,
  pub io_storage_nodes_view: Option<Bitset>,
}

impl AggregatedContext {
  pub fn merge(contexts: &[MiningContext]) -> Self {
    let mut previous_storage_nodes_keys = Vec::new();
    for ctx in contexts {
      for key in &ctx.previous_storage_nodes_keys {
        if !previous_storage_nodes_keys.contains(key) {
          previous_storage_nodes_keys.push(*key);
        }
      }
    }
    Self {
      previous_storage_nodes_keys,
      cross_validation_nodes_view: Bitset::and_merge(contexts.iter().map(|c| &c.cross_validation_nodes_view)),
      chain_storage_nodes_view: Bitset::and_merge(contexts.iter().map(|c| &c.chain_storage_nodes_view)),
      beacon_storage_nodes_view: Bitset::and_merge(contexts.iter().map(|c| &c.beacon_storage_nodes_view)),
      io_storage_nodes_view: Bitset::and_merge(contexts.iter().map(|c| &c.io_storage_nodes_view)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{Keypair, OriginId};

  fn ctx(seed: u8, views: [bool; 2]) -> MiningContext {
    MiningContext {
      validation_node_public_key: Keypair::from_seed(&[seed; 32], OriginId::Software).public(),
      previous_storage_nodes_keys: vec![Keypair::from_seed(&[seed + 100; 32], OriginId::Software).public()],
      cross_validation_nodes_view: Bitset::from_bits(views.to_vec()),
      chain_storage_nodes_view: Bitset::from_bits(views.to_vec()),
      beacon_storage_nodes_view: Bitset::from_bits(views.to_vec()),
      io_storage_nodes_view: Bitset::from_bits(views.to_vec()),
    }
  }

  #[test]
  fn merge_is_conservative_and_dedupes_storage_keys() {
    let a = ctx(1, [true, true]);
    let b = ctx(1, [true, false]);
    let merged = AggregatedContext::merge(&[a, b]);
    assert_eq!(merged.previous_storage_nodes_keys.len(), 1);
    assert_eq!(merged.chain_storage_nodes_view.unwrap().iter().collect::<Vec<_>>(), vec![true, false]);
  }
}
