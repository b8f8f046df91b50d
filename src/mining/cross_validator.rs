use super::coordinator::{compute_validation_stamp, StampInputs};
use crate::fee::FeeError;
use crate::primitives::PublicKey;
use crate::replication::ReplicationTree;
use crate::transaction::{InconsistencyKind, ValidationStamp};

/// Independently recomputes the stamp from `inputs` and diffs every
/// field against the coordinator's `coordinator_stamp`/`coordinator_tree`,
/// returning one [`InconsistencyKind`] per disagreement (§4.3 step 2).
pub fn check_against_coordinator(
  inputs: &StampInputs,
  coordinator_stamp: &ValidationStamp,
  coordinator_daily_key: &PublicKey,
  coordinator_tree: &ReplicationTree,
  expected_tree: &ReplicationTree,
) -> Result<Vec<InconsistencyKind>, FeeError> {
  let mine = compute_validation_stamp(inputs)?;
  let mut inconsistencies = mine.fields_match(coordinator_stamp);

  if !coordinator_stamp.verify_signature(coordinator_daily_key) {
    inconsistencies.push(InconsistencyKind::Signature);
  }
  if coordinator_tree != expected_tree {
    inconsistencies.push(InconsistencyKind::ReplicationTree);
  }
  Ok(inconsistencies)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mining::coordinator::compute_validation_stamp;
  use crate::primitives::{Address, Digest, HashAlgo, Keypair, OriginId, Timestamp};
  use crate::transaction::test_support::build_transfer;
  use crate::transaction::UnspentOutput;
  use crate::fee::FeeSchedule;

  fn inputs<'a>(
    tx: &'a crate::transaction::Transaction,
    change_address: &'a Address,
    utxos: &'a [UnspentOutput],
    origin: &'a [crate::primitives::PublicKey],
    schedule: &'a FeeSchedule,
  ) -> StampInputs<'a> {
    StampInputs {
      tx,
      uco_price_usd: 1.0,
      fee_schedule: schedule,
      prior_utxos: utxos,
      change_address,
      origin_candidates: origin,
      previous_poi: None,
      proof_of_election: Digest::sha3_256(b"seed"),
      recipients: vec![],
      protocol_version: 1,
    }
  }

  #[test]
  fn matching_recomputation_has_no_inconsistencies() {
    let previous = Keypair::from_seed(&[1u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[2u8; 32], OriginId::OnChain);
    let coordinator = Keypair::from_seed(&[3u8; 32], OriginId::Software);
    let recipient =
      Address::from_public_key(&Keypair::from_seed(&[4u8; 32], OriginId::Software).public(), HashAlgo::Sha3_256);
    let tx = build_transfer(&previous, &origin, recipient, 1_000);
    let change_address = Address::from_public_key(&previous.public(), HashAlgo::Sha3_256);
    let utxos = vec![UnspentOutput {
      from: change_address.clone(),
      kind: crate::transaction::UtxoKind::Uco,
      amount: 10_000,
      timestamp: Timestamp::from_micros(0),
    }];
    let origin_keys = vec![origin.public()];
    let schedule = FeeSchedule::default();
    let ins = inputs(&tx, &change_address, &utxos, &origin_keys, &schedule);

    let mut stamp = compute_validation_stamp(&ins).unwrap();
    stamp.sign(|bytes| coordinator.sign(bytes));

    let empty_tree = ReplicationTree { chain: vec![], beacon: vec![], io: vec![] };
    let inconsistencies =
      check_against_coordinator(&ins, &stamp, &coordinator.public(), &empty_tree, &empty_tree).unwrap();
    assert!(inconsistencies.is_empty());
  }

  #[test]
  fn fee_mismatch_is_flagged() {
    let previous = Keypair::from_seed(&[1u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[2u8; 32], OriginId::OnChain);
    let coordinator = Keypair::from_seed(&[3u8; 32], OriginId::Software);
    let recipient =
      Address::from_public_key(&Keypair::from_seed(&[4u8; 32], OriginId::Software).public(), HashAlgo::Sha3_256);
    let tx = build_transfer(&previous, &origin, recipient, 1_000);
    let change_address = Address::from_public_key(&previous.public(), HashAlgo::Sha3_256);
    let utxos = vec![UnspentOutput {
      from: change_address.clone(),
      kind: crate::transaction::UtxoKind::Uco,
      amount: 10_000,
      timestamp: Timestamp::from_micros(0),
    }];
    let origin_keys = vec![origin.public()];
    let schedule = FeeSchedule::default();
    let ins = inputs(&tx, &change_address, &utxos, &origin_keys, &schedule);

    let mut stamp = compute_validation_stamp(&ins).unwrap();
    stamp.ledger_operations.fee += 1;
    stamp.sign(|bytes| coordinator.sign(bytes));

    let empty_tree = ReplicationTree { chain: vec![], beacon: vec![], io: vec![] };
    let inconsistencies =
      check_against_coordinator(&ins, &stamp, &coordinator.public(), &empty_tree, &empty_tree).unwrap();
    assert!(inconsistencies.contains(&InconsistencyKind::TransactionFee));
  }
}
