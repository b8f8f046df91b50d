use crate::primitives::{Address, Timestamp};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// UCO is expressed in `10^8`ths, the on-chain smallest unit.
pub const UCO_SUBUNITS: u64 = 100_000_000;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum UtxoKind {
  Uco,
  Token { token_id: u64 },
}

/// `UnspentOutput{from, type, amount, timestamp, token_id?}`.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct UnspentOutput {
  pub from: Address,
  pub kind: UtxoKind,
  pub amount: u64,
  pub timestamp: Timestamp,
}

/// A resolved, post-validation value movement, attached to the
/// [`crate::transaction::ValidationStamp`].
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct TransactionMovement {
  pub to: Address,
  pub amount: u64,
  pub kind: UtxoKind,
}
