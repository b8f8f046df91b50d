use crate::election::Node;
use crate::primitives::{Address, PublicKey, Timestamp};
use crate::transaction::TransactionMovement;
use std::collections::HashMap;

/// The world-state a pending-validation check needs, beyond the
/// transaction itself. Assembled by the caller from the read-mostly
/// roster and keystore tables.
pub struct ValidationContext<'a> {
  pub now: Timestamp,
  pub max_content_size: usize,
  pub allowed_origin_families: &'a [crate::primitives::OriginId],
  pub root_ca_keys: &'a HashMap<crate::primitives::OriginId, PublicKey>,
  pub authorized_nodes: &'a [Node],
  pub renewal_candidates: &'a [Node],
  pub scheduled_renewal_slot: Timestamp,
  pub technical_council: &'a [Address],
  pub oracle_schedule: Timestamp,
  pub last_summary_burned_fees: u64,
  pub reward_distribution: &'a [TransactionMovement],
  pub known_genesis_addresses: &'a HashMap<NetworkChainKind, Address>,
  pub existing_live_nodes: &'a [(std::net::IpAddr, u16, PublicKey)],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkChainKind {
  NodeSharedSecrets,
  Beacon,
  MintRewards,
  NodeRewards,
}

impl TryFrom<crate::transaction::TransactionType> for NetworkChainKind {
  type Error = ();

  fn try_from(value: crate::transaction::TransactionType) -> Result<Self, Self::Error> {
    use crate::transaction::TransactionType::*;
    match value {
      NodeSharedSecrets => Ok(Self::NodeSharedSecrets),
      Beacon => Ok(Self::Beacon),
      MintRewards => Ok(Self::MintRewards),
      NodeRewards => Ok(Self::NodeRewards),
      _ => Err(()),
    }
  }
}

impl NetworkChainKind {
  pub const ALL: [NetworkChainKind; 4] =
    [Self::NodeSharedSecrets, Self::Beacon, Self::MintRewards, Self::NodeRewards];

  /// The transaction class whose genesis entry this network chain is
  /// rooted at. Inverse of the `TryFrom<TransactionType>` impl above.
  pub fn transaction_type(&self) -> crate::transaction::TransactionType {
    use crate::transaction::TransactionType;
    match self {
      Self::NodeSharedSecrets => TransactionType::NodeSharedSecrets,
      Self::Beacon => TransactionType::Beacon,
      Self::MintRewards => TransactionType::MintRewards,
      Self::NodeRewards => TransactionType::NodeRewards,
    }
  }
}
