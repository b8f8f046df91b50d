//! Process-wide read-mostly tables: the authorized-node roster, the
//! origin-key set, and the root CA keys used by pending validation. All
//! of these are "single-writer replacement" maps per the concurrency
//! model: readers clone an `Arc` snapshot and never block a writer.

use crate::election::Node;
use crate::primitives::{Address, OriginId, PublicKey, Timestamp};
use crate::transaction::TransactionMovement;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

/// A point-in-time view of the authorized-node roster, plus the
/// collaborator tables pending validation and election need alongside
/// it. Cheap to clone: everything behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
  pub authorized: Arc<Vec<Node>>,
  pub renewal_candidates: Arc<Vec<Node>>,
  pub origin_keys: Arc<Vec<PublicKey>>,
  pub root_ca_keys: Arc<HashMap<OriginId, PublicKey>>,
  /// Origin families a `node` transaction's origin key is allowed to
  /// belong to.
  pub allowed_origin_families: Arc<Vec<OriginId>>,
  /// Addresses authorized to submit `code_approval` transactions.
  pub technical_council: Arc<Vec<Address>>,
  /// The currently scheduled oracle poll time; an `oracle` transaction
  /// must declare exactly this.
  pub oracle_schedule: Timestamp,
  /// Total fees burned since the last oracle summary, the figure a
  /// `mint_rewards` transaction's declared supply must match.
  pub last_summary_burned_fees: u64,
  /// The reward movements a `node_rewards` transaction must reproduce
  /// exactly, in order.
  pub reward_distribution: Arc<Vec<TransactionMovement>>,
  /// `(ip, port, public_key)` of every node currently live on the
  /// network, used to reject duplicate `node`/`origin` registrations.
  pub existing_live_nodes: Arc<Vec<(IpAddr, u16, PublicKey)>>,
}

/// The read-mostly roster table described in Design Notes §5: many
/// concurrent readers, one writer that atomically swaps in a whole new
/// snapshot on a network event (a `node` transaction being replicated, a
/// shared-secrets renewal, ...).
#[derive(Debug, Default)]
pub struct Roster {
  inner: RwLock<RosterSnapshot>,
}

impl Roster {
  pub fn new(snapshot: RosterSnapshot) -> Self {
    Self { inner: RwLock::new(snapshot) }
  }

  /// A cheap clone of the current snapshot; readers never block the
  /// writer and vice versa beyond the brief lock held to clone the Arcs.
  pub fn snapshot(&self) -> RosterSnapshot {
    self.inner.read().clone()
  }

  /// Atomically replaces the whole snapshot.
  pub fn replace(&self, snapshot: RosterSnapshot) {
    *self.inner.write() = snapshot;
  }

  pub fn authorized_nodes(&self) -> Arc<Vec<Node>> {
    self.inner.read().authorized.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{Keypair, Timestamp};
  use std::net::{IpAddr, Ipv4Addr};

  fn node(seed: u8) -> Node {
    Node::new(
      Keypair::from_seed(&[seed; 32], OriginId::Software).public(),
      Timestamp::from_micros(0),
      "EU",
      IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
      9000,
    )
  }

  #[test]
  fn replace_is_visible_to_new_snapshots() {
    let roster = Roster::new(RosterSnapshot::default());
    assert!(roster.snapshot().authorized.is_empty());
    roster.replace(RosterSnapshot {
      authorized: Arc::new(vec![node(1)]),
      ..Default::default()
    });
    assert_eq!(roster.snapshot().authorized.len(), 1);
  }
}
