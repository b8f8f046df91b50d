use crate::primitives::PublicKey;
use crate::transaction::{CrossValidationStamp, InconsistencyKind};
use itertools::Itertools;

/// The atomic commitment rule (§4.3 step 7): every cross-validator must
/// report zero inconsistencies, or the transaction is not committed at
/// all. A single dissenting stamp aborts the whole workflow.
pub fn commits(stamps: &[CrossValidationStamp]) -> bool {
  !stamps.is_empty() && stamps.iter().all(CrossValidationStamp::is_ok)
}

/// Groups cross-validators by the exact inconsistency vector they
/// reported. When a strict majority agrees on one vector (including the
/// empty one), everyone outside that group is presumed dishonest and
/// returned for governance to act on. Returns an empty list when there
/// is no strict majority to compare against (e.g. an even 50/50 split).
pub fn dishonest_validators(stamps: &[CrossValidationStamp]) -> Vec<PublicKey> {
  if stamps.is_empty() {
    return Vec::new();
  }
  let groups = stamps
    .iter()
    .into_group_map_by(|stamp| stamp.inconsistencies.clone());

  let majority_size = stamps.len() / 2 + 1;
  let majority = groups.values().find(|members| members.len() >= majority_size);

  match majority {
    Some(majority) => stamps
      .iter()
      .filter(|stamp| !majority.iter().any(|m| m.node_public_key == stamp.node_public_key))
      .map(|stamp| stamp.node_public_key)
      .collect(),
    None => Vec::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{Digest, Keypair, OriginId, Signature, Timestamp};
  use crate::transaction::{LedgerOperations, ValidationStamp};

  fn dummy_stamp() -> ValidationStamp {
    ValidationStamp {
      timestamp: Timestamp::from_micros(0),
      proof_of_work: None,
      proof_of_integrity: Digest::sha3_256(b"poi"),
      proof_of_election: Digest::sha3_256(b"seed"),
      ledger_operations: LedgerOperations { fee: 0, transaction_movements: vec![], unspent_outputs: vec![] },
      recipients: vec![],
      signature: Signature::from_bytes([0u8; 64]),
      protocol_version: 1,
    }
  }

  fn stamp(seed: u8, inconsistencies: Vec<InconsistencyKind>) -> CrossValidationStamp {
    let key = Keypair::from_seed(&[seed; 32], OriginId::Software);
    CrossValidationStamp::new(key.public(), &dummy_stamp(), inconsistencies, |bytes| key.sign(bytes))
  }

  #[test]
  fn commits_requires_every_stamp_clean() {
    let clean = vec![stamp(1, vec![]), stamp(2, vec![])];
    assert!(commits(&clean));

    let dirty = vec![stamp(1, vec![]), stamp(2, vec![InconsistencyKind::TransactionFee])];
    assert!(!commits(&dirty));
  }

  #[test]
  fn commits_is_false_with_no_stamps() {
    assert!(!commits(&[]));
  }

  #[test]
  fn dishonest_validators_is_the_minority_against_the_clean_majority() {
    let a = stamp(1, vec![]);
    let b = stamp(2, vec![]);
    let c = stamp(3, vec![InconsistencyKind::TransactionFee]);
    let dishonest = dishonest_validators(&[a.clone(), b.clone(), c.clone()]);
    assert_eq!(dishonest, vec![c.node_public_key]);
  }

  #[test]
  fn no_majority_reports_nobody() {
    let a = stamp(1, vec![]);
    let b = stamp(2, vec![InconsistencyKind::TransactionFee]);
    assert!(dishonest_validators(&[a, b]).is_empty());
  }
}
