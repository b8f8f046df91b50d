pub mod context;
pub mod error;
pub mod rules;

pub use context::{NetworkChainKind, ValidationContext};
pub use error::ValidationError;
pub use rules::validate_pending_transaction;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{HashAlgo, Keypair, OriginId, Timestamp};
  use crate::transaction::test_support::build_transfer;
  use std::collections::HashMap;

  fn ctx<'a>(
    genesis: &'a HashMap<NetworkChainKind, crate::primitives::Address>,
    root_ca: &'a HashMap<crate::primitives::OriginId, crate::primitives::PublicKey>,
  ) -> ValidationContext<'a> {
    ValidationContext {
      now: Timestamp::now(),
      max_content_size: 1 << 20,
      allowed_origin_families: &[],
      root_ca_keys: root_ca,
      authorized_nodes: &[],
      renewal_candidates: &[],
      scheduled_renewal_slot: Timestamp::from_micros(0),
      technical_council: &[],
      oracle_schedule: Timestamp::from_micros(0),
      last_summary_burned_fees: 0,
      reward_distribution: &[],
      known_genesis_addresses: genesis,
      existing_live_nodes: &[],
    }
  }

  #[test]
  fn plain_transfer_passes_with_no_extra_rule() {
    let previous = Keypair::from_seed(&[1u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[2u8; 32], OriginId::OnChain);
    let recipient = crate::primitives::Address::from_public_key(
      &Keypair::from_seed(&[3u8; 32], OriginId::Software).public(),
      HashAlgo::Sha3_256,
    );
    let tx = build_transfer(&previous, &origin, recipient, 500);
    let genesis = HashMap::new();
    let root_ca = HashMap::new();
    assert!(validate_pending_transaction(&tx, &ctx(&genesis, &root_ca)).is_ok());
  }

  #[test]
  fn oversized_content_is_rejected() {
    let previous = Keypair::from_seed(&[1u8; 32], OriginId::Software);
    let origin = Keypair::from_seed(&[2u8; 32], OriginId::OnChain);
    let recipient = crate::primitives::Address::from_public_key(
      &Keypair::from_seed(&[3u8; 32], OriginId::Software).public(),
      HashAlgo::Sha3_256,
    );
    let tx = build_transfer(&previous, &origin, recipient, 500);
    let genesis = HashMap::new();
    let root_ca = HashMap::new();
    let mut small = ctx(&genesis, &root_ca);
    small.max_content_size = 1;
    assert_eq!(
      validate_pending_transaction(&tx, &small),
      Err(ValidationError::ContentTooLarge)
    );
  }
}
