pub mod content;
pub mod ledger;
pub mod stamp;

pub use content::{DeclaredLedger, DeclaredTransfer, Ownership, TransactionData, TransactionType};
pub use ledger::{TransactionMovement, UnspentOutput, UtxoKind};
pub use stamp::{CrossValidationStamp, InconsistencyKind, LedgerOperations, ValidationStamp};

use crate::primitives::{Address, HashAlgo, PublicKey, Signature, Timestamp};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A transaction, immutable once `origin_signature` is set.
///
/// `timestamp` is the welcome node's reception time, stamped before
/// election runs; it is what committee eligibility is checked against.
/// The coordinator's [`ValidationStamp::timestamp`] is produced later
/// and must not precede it.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Transaction {
  pub address: Address,
  pub tx_type: TransactionType,
  pub timestamp: Timestamp,
  pub data: TransactionData,
  pub previous_public_key: PublicKey,
  pub previous_signature: Signature,
  pub origin_signature: Signature,
  pub validation_stamp: Option<ValidationStamp>,
  pub cross_validation_stamps: Vec<CrossValidationStamp>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
  #[error("address does not hash from previous_public_key")]
  AddressMismatch,
  #[error("previous_signature does not verify under previous_public_key")]
  InvalidPreviousSignature,
}

impl Transaction {
  /// The portion of the transaction that is signed by `previous_signature`:
  /// everything but the two signature fields and the post-validation ones.
  pub fn pending_bytes(&self) -> Vec<u8> {
    borsh::to_vec(&(
      &self.address,
      &self.tx_type,
      &self.timestamp,
      &self.data,
      &self.previous_public_key,
    ))
    .expect("borsh encoding of pending transaction cannot fail")
  }

  /// `pending_bytes() || previous_signature`, the message `origin_signature`
  /// is computed over.
  pub fn previous_signed_bytes(&self) -> Vec<u8> {
    let mut out = self.pending_bytes();
    out.extend_from_slice(&self.previous_signature.to_bytes());
    out
  }

  pub fn verify_address(&self) -> Result<(), TransactionError> {
    let expected = Address::from_public_key(&self.previous_public_key, HashAlgo::Sha3_256);
    if expected == self.address {
      Ok(())
    } else {
      Err(TransactionError::AddressMismatch)
    }
  }

  pub fn verify_previous_signature(&self) -> Result<(), TransactionError> {
    if self.previous_public_key.verify(&self.pending_bytes(), &self.previous_signature) {
      Ok(())
    } else {
      Err(TransactionError::InvalidPreviousSignature)
    }
  }

  /// Returns the first key in `candidates` under which `origin_signature`
  /// verifies: the proof-of-work search over candidate origin keys.
  pub fn find_proof_of_work(&self, candidates: &[PublicKey]) -> Option<PublicKey> {
    let message = self.previous_signed_bytes();
    candidates.iter().find(|pk| pk.verify(&message, &self.origin_signature)).copied()
  }

  pub fn byte_len(&self) -> usize {
    borsh::to_vec(self).map(|v| v.len()).unwrap_or(0)
  }

  /// `POI_n = hash(serialize(tx_n_pending) || POI_{n-1})`, or the genesis
  /// form when `previous` is `None`.
  pub fn proof_of_integrity(&self, previous: Option<&crate::primitives::Digest>) -> crate::primitives::Digest {
    crate::primitives::hash::proof_of_integrity(&self.pending_bytes(), previous)
  }
}


#[cfg(test)]
mod tests {
  use super::test_support::build_transfer;
  use super::*;
  use crate::primitives::{Keypair, OriginId};

  #[test]
  fn address_and_signature_invariants_hold() {
    let previous = Keypair::from_seed(&[1u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[2u8; 32], OriginId::OnChain);
    let recipient = Address::from_public_key(
      &Keypair::from_seed(&[9u8; 32], OriginId::Software).public(),
      HashAlgo::Sha3_256,
    );
    let tx = build_transfer(&previous, &origin, recipient, 1_000_000);
    assert!(tx.verify_address().is_ok());
    assert!(tx.verify_previous_signature().is_ok());
    assert_eq!(tx.find_proof_of_work(&[origin.public()]), Some(origin.public()));
    assert_eq!(tx.find_proof_of_work(&[previous.public()]), None);
  }
}
