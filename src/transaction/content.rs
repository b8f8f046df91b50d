use crate::primitives::{Address, PublicKey};
use borsh::{BorshDeserialize, BorshSerialize};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Closed enum of transaction classes. System classes drive
/// network bookkeeping (node roster, shared secrets, rewards, ...); user
/// classes move value or assets.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum TransactionType {
  Transfer,
  Token,
  Node,
  NodeSharedSecrets,
  Oracle,
  OracleSummary,
  MintRewards,
  NodeRewards,
  CodeProposal,
  CodeApproval,
  Keychain,
  KeychainAccess,
  Beacon,
  Origin,
}

impl TransactionType {
  /// Transactions whose `previous_address` must chain back to a
  /// recognized network genesis.
  pub fn is_network_chain(&self) -> bool {
    matches!(self, Self::NodeSharedSecrets | Self::Beacon | Self::MintRewards | Self::NodeRewards)
  }
}

/// `{secret, authorized_keys: map<public_key, encrypted_aes_key>}`. Grants
/// every key in `authorized_keys` the ability to recover `secret` by
/// ECIES-decrypting its entry with the matching private key.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Ownership {
  pub secret: Vec<u8>,
  pub authorized_keys: IndexMap<PublicKey, Vec<u8>>,
}

impl Ownership {
  pub fn authorizes(&self, key: &PublicKey) -> bool {
    self.authorized_keys.contains_key(key)
  }
}

/// A single declared UCO or token transfer in the pending form of a
/// transaction, before fee/UTXO resolution.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct DeclaredTransfer {
  pub to: Address,
  pub amount: u64,
  pub token_id: Option<String>,
}

/// `ledger { UCO, token }` plus `recipients`, the declared (not yet
/// resolved) value-movement intent of a transaction.
#[derive(Debug, Clone, Default, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct DeclaredLedger {
  pub uco: Vec<DeclaredTransfer>,
  pub token: Vec<DeclaredTransfer>,
}

impl DeclaredLedger {
  pub fn movement_count(&self) -> usize {
    self.uco.len() + self.token.len()
  }

  pub fn total_uco(&self) -> u64 {
    self.uco.iter().map(|t| t.amount).sum()
  }
}

/// The non-signature payload of a transaction.
#[derive(Debug, Clone, Default, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct TransactionData {
  pub content: Vec<u8>,
  pub code: Vec<u8>,
  pub ownerships: Vec<Ownership>,
  pub ledger: DeclaredLedger,
  pub recipients: Vec<PublicKey>,
}
