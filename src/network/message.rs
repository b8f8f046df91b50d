//! Wire messages mining uses (§6). Each is length-prefixed and
//! type-tagged by the transport; that framing lives in the transport
//! implementation, not here — this enum is the payload.

use crate::mining::context::MiningContext;
use crate::primitives::{Address, Bitset, PublicKey, Signature};
use crate::replication::ReplicationTree;
use crate::transaction::{CrossValidationStamp, Transaction, ValidationStamp};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum ErrorReason {
  NetworkIssue,
  InvalidTransaction,
  TransactionAlreadyExists,
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum WireMessage {
  StartMining {
    transaction: Transaction,
    welcome_node_public_key: PublicKey,
    validation_node_public_keys: Vec<PublicKey>,
  },
  AddMiningContext {
    address: Address,
    context: MiningContext,
  },
  CrossValidate {
    address: Address,
    validation_stamp: ValidationStamp,
    replication_tree: ReplicationTree,
    confirmed_validation_nodes: Bitset,
  },
  CrossValidationDone {
    address: Address,
    cross_validation_stamp: CrossValidationStamp,
  },
  ReplicateTransactionChain {
    transaction: Transaction,
  },
  ReplicateTransaction {
    transaction: Transaction,
  },
  AcknowledgeStorage {
    address: Address,
    node_public_key: PublicKey,
    signature: Signature,
  },
  Error {
    reason: ErrorReason,
    address: Address,
  },
  /// Not on the wire per se: the empty reply a fire-and-forget send
  /// still needs to satisfy `send_message`'s `Result<Reply, NetErr>`
  /// signature when the peer has nothing specific to say back.
  Ack,
}

impl WireMessage {
  pub fn election_nodes(&self) -> Option<&[PublicKey]> {
    match self {
      Self::StartMining { validation_node_public_keys, .. } => Some(validation_node_public_keys),
      _ => None,
    }
  }
}
