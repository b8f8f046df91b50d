use crate::fee::{build_ledger_operations, calculate_fee, FeeError, FeeSchedule};
use crate::primitives::{Address, Digest, PublicKey, Signature};
use crate::transaction::{Transaction, UnspentOutput, ValidationStamp};

/// Everything needed to (re)compute a [`ValidationStamp`] for a
/// transaction, independent of who's computing it: the coordinator uses
/// this to produce the stamp, and every cross-validator recomputes the
/// exact same inputs to check it (§4.3 steps 1-6).
pub struct StampInputs<'a> {
  pub tx: &'a Transaction,
  pub uco_price_usd: f64,
  pub fee_schedule: &'a FeeSchedule,
  pub prior_utxos: &'a [UnspentOutput],
  pub change_address: &'a Address,
  pub origin_candidates: &'a [PublicKey],
  pub previous_poi: Option<&'a Digest>,
  pub proof_of_election: Digest,
  pub recipients: Vec<Address>,
  pub protocol_version: u32,
}

/// Computes an unsigned [`ValidationStamp`]: fee, ledger operations,
/// proof of work, proof of integrity. The caller signs it afterwards
/// with whichever key its role calls for (the coordinator's daily key).
pub fn compute_validation_stamp(inputs: &StampInputs) -> Result<ValidationStamp, FeeError> {
  let fee = calculate_fee(inputs.tx, inputs.uco_price_usd, inputs.fee_schedule);
  let ledger_operations =
    build_ledger_operations(inputs.tx, fee, inputs.prior_utxos, inputs.change_address)?;
  let proof_of_work = inputs.tx.find_proof_of_work(inputs.origin_candidates);
  let proof_of_integrity = inputs.tx.proof_of_integrity(inputs.previous_poi);

  Ok(ValidationStamp {
    timestamp: inputs.tx.timestamp,
    proof_of_work,
    proof_of_integrity,
    proof_of_election: inputs.proof_of_election.clone(),
    ledger_operations,
    recipients: inputs.recipients.clone(),
    signature: Signature::from_bytes([0u8; 64]),
    protocol_version: inputs.protocol_version,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{HashAlgo, Keypair, OriginId, Timestamp};
  use crate::transaction::test_support::build_transfer;

  #[test]
  fn same_inputs_yield_the_same_stamp() {
    let previous = Keypair::from_seed(&[1u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[2u8; 32], OriginId::OnChain);
    let recipient = Address::from_public_key(
      &Keypair::from_seed(&[3u8; 32], OriginId::Software).public(),
      HashAlgo::Sha3_256,
    );
    let tx = build_transfer(&previous, &origin, recipient, 1_000);
    let change_address = Address::from_public_key(&previous.public(), HashAlgo::Sha3_256);
    let utxos = vec![UnspentOutput {
      from: change_address.clone(),
      kind: crate::transaction::UtxoKind::Uco,
      amount: 10_000,
      timestamp: Timestamp::from_micros(0),
    }];
    let schedule = FeeSchedule::default();
    let inputs = StampInputs {
      tx: &tx,
      uco_price_usd: 1.0,
      fee_schedule: &schedule,
      prior_utxos: &utxos,
      change_address: &change_address,
      origin_candidates: &[origin.public()],
      previous_poi: None,
      proof_of_election: Digest::sha3_256(b"seed"),
      recipients: vec![],
      protocol_version: 1,
    };
    let a = compute_validation_stamp(&inputs).unwrap();
    let b = compute_validation_stamp(&inputs).unwrap();
    assert_eq!(a.ledger_operations, b.ledger_operations);
    assert_eq!(a.proof_of_work, Some(origin.public()));
  }
}
