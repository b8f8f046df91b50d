use super::ledger::{TransactionMovement, UnspentOutput};
use crate::primitives::{Address, Digest, PublicKey, Signature, Timestamp};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// The fee and the UTXO-level effects the coordinator computed for a
/// transaction.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct LedgerOperations {
  pub fee: u64,
  pub transaction_movements: Vec<TransactionMovement>,
  pub unspent_outputs: Vec<UnspentOutput>,
}

/// A disagreement a cross-validator found between its own recomputation
/// and the coordinator's [`ValidationStamp`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum InconsistencyKind {
  Timestamp,
  ProofOfWork,
  ProofOfIntegrity,
  TransactionFee,
  TransactionMovements,
  UnspentOutputs,
  Signature,
  ReplicationTree,
}

/// Produced by the coordinator once per transaction.
/// `signature` covers every other field and is produced with the
/// coordinator's *daily* node-shared-secret key, not its permanent node
/// key.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct ValidationStamp {
  pub timestamp: Timestamp,
  pub proof_of_work: Option<PublicKey>,
  pub proof_of_integrity: Digest,
  pub proof_of_election: Digest,
  pub ledger_operations: LedgerOperations,
  pub recipients: Vec<Address>,
  pub signature: Signature,
  pub protocol_version: u32,
}

impl ValidationStamp {
  /// Bytes signed by the coordinator: every field but `signature` itself.
  pub fn signed_bytes(&self) -> Vec<u8> {
    borsh::to_vec(&(
      &self.timestamp,
      &self.proof_of_work,
      &self.proof_of_integrity,
      &self.proof_of_election,
      &self.ledger_operations,
      &self.recipients,
      self.protocol_version,
    ))
    .expect("borsh encoding of a validation stamp cannot fail")
  }

  pub fn sign(&mut self, sign: impl FnOnce(&[u8]) -> Signature) {
    self.signature = sign(&self.signed_bytes());
  }

  pub fn verify_signature(&self, coordinator_daily_key: &PublicKey) -> bool {
    coordinator_daily_key.verify(&self.signed_bytes(), &self.signature)
  }

  /// Equality ignoring `signature`, used by cross-validators to decide
  /// whether their own recomputation matches the coordinator's (any
  /// mismatched field becomes an [`InconsistencyKind`]).
  pub fn fields_match(&self, other: &ValidationStamp) -> Vec<InconsistencyKind> {
    let mut out = Vec::new();
    if self.timestamp != other.timestamp {
      out.push(InconsistencyKind::Timestamp);
    }
    if self.proof_of_work != other.proof_of_work {
      out.push(InconsistencyKind::ProofOfWork);
    }
    if self.proof_of_integrity != other.proof_of_integrity {
      out.push(InconsistencyKind::ProofOfIntegrity);
    }
    if self.ledger_operations.fee != other.ledger_operations.fee {
      out.push(InconsistencyKind::TransactionFee);
    }
    if self.ledger_operations.transaction_movements != other.ledger_operations.transaction_movements
    {
      out.push(InconsistencyKind::TransactionMovements);
    }
    if self.ledger_operations.unspent_outputs != other.ledger_operations.unspent_outputs {
      out.push(InconsistencyKind::UnspentOutputs);
    }
    out
  }
}

/// `{node_public_key, signature, inconsistencies}`. Signature
/// covers `(validation_stamp, inconsistencies)`.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct CrossValidationStamp {
  pub node_public_key: PublicKey,
  pub signature: Signature,
  pub inconsistencies: Vec<InconsistencyKind>,
}

impl CrossValidationStamp {
  pub fn signed_bytes(stamp: &ValidationStamp, inconsistencies: &[InconsistencyKind]) -> Vec<u8> {
    borsh::to_vec(&(stamp, inconsistencies)).expect("borsh encoding cannot fail")
  }

  pub fn new(
    node_public_key: PublicKey,
    stamp: &ValidationStamp,
    inconsistencies: Vec<InconsistencyKind>,
    sign: impl FnOnce(&[u8]) -> Signature,
  ) -> Self {
    let signature = sign(&Self::signed_bytes(stamp, &inconsistencies));
    Self { node_public_key, signature, inconsistencies }
  }

  pub fn is_ok(&self) -> bool {
    self.inconsistencies.is_empty()
  }

  pub fn verify(&self, stamp: &ValidationStamp) -> bool {
    self.node_public_key.verify(&Self::signed_bytes(stamp, &self.inconsistencies), &self.signature)
  }
}
