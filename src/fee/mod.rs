use crate::primitives::Address;
use crate::transaction::ledger::UCO_SUBUNITS;
use crate::transaction::{LedgerOperations, Transaction, TransactionMovement, UnspentOutput, UtxoKind};
use thiserror::Error;

/// USD-denominated fee weights. Kept as plain `f64` since the
/// fee formula is pure and deterministic given a fixed `uco_usd_price`;
/// no rounding-mode ambiguity survives past the final integer conversion.
#[derive(Debug, Clone, Copy)]
pub struct FeeSchedule {
  pub base_fee_usd: f64,
  pub size_fee_per_byte_usd: f64,
  pub movement_fee_usd: f64,
  pub contract_fee_usd: f64,
}

impl Default for FeeSchedule {
  fn default() -> Self {
    Self {
      base_fee_usd: 0.01,
      size_fee_per_byte_usd: 0.0000005,
      movement_fee_usd: 0.002,
      contract_fee_usd: 0.05,
    }
  }
}

/// `F(tx, uco_usd_price)`: deterministic, no I/O, scaled
/// inversely by `uco_usd_price` so the fee tracks a stable USD target.
pub fn calculate_fee(tx: &Transaction, uco_usd_price: f64, schedule: &FeeSchedule) -> u64 {
  assert!(uco_usd_price > 0.0, "uco_usd_price must be positive");
  let movements = tx.data.ledger.movement_count() as f64;
  let contract_fee = if tx.data.code.is_empty() { 0.0 } else { schedule.contract_fee_usd };
  let usd = schedule.base_fee_usd
    + schedule.size_fee_per_byte_usd * tx.byte_len() as f64
    + schedule.movement_fee_usd * movements
    + contract_fee;
  let uco = usd / uco_usd_price;
  (uco * UCO_SUBUNITS as f64).round() as u64
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeError {
  #[error("insufficient unspent outputs to cover amount + fee")]
  InsufficientFunds,
}

/// Consumes `prior_utxos` LIFO (most-recently-created first) until the
/// declared UCO movements plus `fee` are covered, emitting a change UTXO
/// back to `change_address` for any remainder.
pub fn build_ledger_operations(
  tx: &Transaction,
  fee: u64,
  prior_utxos: &[UnspentOutput],
  change_address: &Address,
) -> Result<LedgerOperations, FeeError> {
  let needed = tx.data.ledger.total_uco() + fee;

  let mut sorted: Vec<&UnspentOutput> =
    prior_utxos.iter().filter(|u| matches!(u.kind, UtxoKind::Uco)).collect();
  sorted.sort_by_key(|u| u.timestamp);

  let mut consumed = 0u64;
  let mut spent = Vec::new();
  for utxo in sorted.into_iter().rev() {
    if consumed >= needed {
      break;
    }
    consumed += utxo.amount;
    spent.push(utxo.clone());
  }
  if consumed < needed {
    return Err(FeeError::InsufficientFunds);
  }

  let mut unspent_outputs: Vec<UnspentOutput> = Vec::new();
  let change = consumed - needed;
  if change > 0 {
    unspent_outputs.push(UnspentOutput {
      from: change_address.clone(),
      kind: UtxoKind::Uco,
      amount: change,
      timestamp: tx.timestamp,
    });
  }
  for transfer in &tx.data.ledger.uco {
    unspent_outputs.push(UnspentOutput {
      from: transfer.to.clone(),
      kind: UtxoKind::Uco,
      amount: transfer.amount,
      timestamp: tx.timestamp,
    });
  }

  let transaction_movements = tx
    .data
    .ledger
    .uco
    .iter()
    .map(|t| TransactionMovement { to: t.to.clone(), amount: t.amount, kind: UtxoKind::Uco })
    .chain(tx.data.ledger.token.iter().map(|t| TransactionMovement {
      to: t.to.clone(),
      amount: t.amount,
      kind: UtxoKind::Token { token_id: t.token_id.as_deref().map(hash_token_id).unwrap_or(0) },
    }))
    .collect();

  Ok(LedgerOperations { fee, transaction_movements, unspent_outputs })
}

fn hash_token_id(id: &str) -> u64 {
  use std::hash::{Hash, Hasher};
  let mut hasher = std::collections::hash_map::DefaultHasher::new();
  id.hash(&mut hasher);
  hasher.finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{HashAlgo, Keypair, OriginId, Timestamp};
  use crate::transaction::test_support::build_transfer;

  fn addr(seed: u8) -> Address {
    Address::from_public_key(&Keypair::from_seed(&[seed; 32], OriginId::Software).public(), HashAlgo::Sha3_256)
  }

  #[test]
  fn fee_is_monotonic_in_size_and_movements() {
    let previous = Keypair::from_seed(&[1u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[2u8; 32], OriginId::OnChain);
    let small = build_transfer(&previous, &origin, addr(9), 1);
    let mut big = small.clone();
    big.data.ledger.uco.push(crate::transaction::DeclaredTransfer { to: addr(10), amount: 2, token_id: None });
    big.data.content = vec![0u8; 4096];

    let schedule = FeeSchedule::default();
    let fee_small = calculate_fee(&small, 1.0, &schedule);
    let fee_big = calculate_fee(&big, 1.0, &schedule);
    assert!(fee_big >= fee_small);
  }

  #[test]
  fn ledger_operations_consume_lifo_and_emit_change() {
    let previous = Keypair::from_seed(&[1u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[2u8; 32], OriginId::OnChain);
    let tx = build_transfer(&previous, &origin, addr(9), 1_000_000);
    let change_address = Address::from_public_key(&previous.public(), HashAlgo::Sha3_256);

    let utxos = vec![
      UnspentOutput { from: addr(20), kind: UtxoKind::Uco, amount: 200_000, timestamp: Timestamp::from_micros(1) },
      UnspentOutput { from: addr(21), kind: UtxoKind::Uco, amount: 2_000_000, timestamp: Timestamp::from_micros(2) },
    ];
    let ops = build_ledger_operations(&tx, 10_000, &utxos, &change_address).unwrap();
    assert_eq!(ops.fee, 10_000);
    let change: u64 = ops.unspent_outputs.iter().filter(|u| u.from == change_address).map(|u| u.amount).sum();
    assert_eq!(change, 2_000_000 - 1_000_000 - 10_000);
  }

  #[test]
  fn insufficient_funds_is_reported() {
    let previous = Keypair::from_seed(&[1u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[2u8; 32], OriginId::OnChain);
    let tx = build_transfer(&previous, &origin, addr(9), 1_000_000);
    let change_address = Address::from_public_key(&previous.public(), HashAlgo::Sha3_256);
    let utxos = vec![UnspentOutput { from: addr(20), kind: UtxoKind::Uco, amount: 10, timestamp: Timestamp::from_micros(1) }];
    assert_eq!(build_ledger_operations(&tx, 0, &utxos, &change_address), Err(FeeError::InsufficientFunds));
  }
}
