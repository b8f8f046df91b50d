use super::context::{NetworkChainKind, ValidationContext};
use super::error::ValidationError;
use crate::primitives::{Address, PublicKey};
use crate::transaction::{Transaction, TransactionType};
use serde::Deserialize;
use std::collections::HashSet;

/// `node` content: `(ip, port, http_port, transport, reward_addr,
/// origin_pk, cert)`.
#[derive(Deserialize)]
pub struct NodeContent {
  pub ip: std::net::IpAddr,
  pub port: u16,
  pub http_port: u16,
  pub transport: String,
  pub reward_address: Address,
  pub origin_public_key: PublicKey,
  pub certificate: Vec<u8>,
}

#[derive(Deserialize)]
pub struct NodeSharedSecretsContent {
  pub trigger_time: crate::primitives::Timestamp,
  pub encrypted_secrets: Vec<u8>,
}

#[derive(Deserialize)]
pub struct OriginContent {
  pub origin_public_key: PublicKey,
  pub certificate: Vec<u8>,
}

#[derive(Deserialize)]
pub struct OracleContent {
  pub trigger_time: crate::primitives::Timestamp,
  pub services: Vec<String>,
}

#[derive(Deserialize)]
pub struct CodeProposalContent {
  pub version: u32,
  pub diff: String,
}

#[derive(Deserialize)]
pub struct CodeApprovalContent {
  pub proposal_address: Address,
}

#[derive(Deserialize)]
pub struct TokenCollectionItem {
  pub id: u64,
}

#[derive(Deserialize)]
pub struct TokenContent {
  #[serde(rename = "type")]
  pub kind: String,
  pub supply: u64,
  #[serde(default)]
  pub collection: Vec<TokenCollectionItem>,
  pub decimals: u8,
}

#[derive(Deserialize)]
pub struct KeychainContent {
  pub did_document: serde_json::Value,
}

fn decode_json<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T, ValidationError> {
  serde_json::from_slice(bytes).map_err(|e| ValidationError::InvalidContent(e.to_string()))
}

/// Checks that apply regardless of `tx.tx_type`: address, signature,
/// size, contract parseability, and network-chain continuity.
pub fn validate_universal(tx: &Transaction, ctx: &ValidationContext) -> Result<(), ValidationError> {
  tx.verify_address().map_err(|_| ValidationError::InvalidAddress)?;
  tx.verify_previous_signature().map_err(|_| ValidationError::InvalidPreviousSignature)?;
  if tx.byte_len() > ctx.max_content_size {
    return Err(ValidationError::ContentTooLarge);
  }
  if !tx.data.code.is_empty() {
    validate_contract_parses(&tx.data.code)?;
  }
  if tx.tx_type.is_network_chain() {
    validate_network_chain_continuity(tx, ctx)?;
  }
  Ok(())
}

/// Smart-contract parsing is an external collaborator; this
/// only checks the code is syntactically plausible (non-empty, balanced
/// braces) as a stand-in for the real interpreter's `parse` entrypoint.
fn validate_contract_parses(code: &[u8]) -> Result<(), ValidationError> {
  let text = std::str::from_utf8(code).map_err(|_| ValidationError::ContractParseError)?;
  let mut depth = 0i32;
  for c in text.chars() {
    match c {
      '{' => depth += 1,
      '}' => depth -= 1,
      _ => {}
    }
    if depth < 0 {
      return Err(ValidationError::ContractParseError);
    }
  }
  if depth != 0 {
    return Err(ValidationError::ContractParseError);
  }
  Ok(())
}

fn validate_network_chain_continuity(
  tx: &Transaction,
  ctx: &ValidationContext,
) -> Result<(), ValidationError> {
  let kind: NetworkChainKind =
    tx.tx_type.try_into().expect("is_network_chain implies a NetworkChainKind exists");
  let previous_address = Address::from_public_key(&tx.previous_public_key, tx.address.digest.algo);
  match ctx.known_genesis_addresses.get(&kind) {
    Some(genesis) if *genesis == previous_address => Ok(()),
    _ => Err(ValidationError::InvalidNetworkChain),
  }
}

pub fn validate_node(tx: &Transaction, ctx: &ValidationContext) -> Result<(), ValidationError> {
  let content: NodeContent = decode_json(&tx.data.content)?;
  if !ctx.allowed_origin_families.contains(&content.origin_public_key.origin) {
    return Err(ValidationError::InvalidContent("origin key not in an allowed family".into()));
  }
  let Some(root_ca) = ctx.root_ca_keys.get(&content.origin_public_key.origin) else {
    return Err(ValidationError::InvalidContent("no root CA for origin family".into()));
  };
  if !root_ca.verify(&content.origin_public_key.to_prefixed_bytes(), &signature_from_cert(&content.certificate)) {
    return Err(ValidationError::InvalidContent("certificate does not verify".into()));
  }
  if ctx
    .existing_live_nodes
    .iter()
    .any(|(ip, port, pk)| *ip == content.ip && *port == content.port && *pk != tx.previous_public_key)
  {
    return Err(ValidationError::DuplicateNode);
  }
  for transfer in &tx.data.ledger.token {
    if transfer.token_id.as_deref() != Some("reward") {
      return Err(ValidationError::InvalidContent("node transactions may only move reward tokens".into()));
    }
  }
  Ok(())
}

fn signature_from_cert(cert: &[u8]) -> crate::primitives::Signature {
  let mut bytes = [0u8; 64];
  let n = cert.len().min(64);
  bytes[..n].copy_from_slice(&cert[..n]);
  crate::primitives::Signature::from_bytes(bytes)
}

pub fn validate_node_shared_secrets(
  tx: &Transaction,
  ctx: &ValidationContext,
) -> Result<(), ValidationError> {
  if tx.data.ownerships.len() != 1 {
    return Err(ValidationError::InvalidContent("expected exactly one ownership".into()));
  }
  let content: NodeSharedSecretsContent = decode_json(&tx.data.content)?;
  if content.trigger_time != ctx.scheduled_renewal_slot {
    return Err(ValidationError::InvalidSchedule);
  }
  let allowed: HashSet<&PublicKey> = ctx
    .authorized_nodes
    .iter()
    .chain(ctx.renewal_candidates.iter())
    .map(|n| &n.public_key)
    .collect();
  let ownership = &tx.data.ownerships[0];
  if !ownership.authorized_keys.keys().all(|k| allowed.contains(k)) {
    return Err(ValidationError::InvalidContent(
      "authorized_keys contains a key outside the authorized/renewal set".into(),
    ));
  }
  Ok(())
}

pub fn validate_origin(tx: &Transaction, ctx: &ValidationContext) -> Result<(), ValidationError> {
  let content: OriginContent = decode_json(&tx.data.content)?;
  if ctx.existing_live_nodes.iter().any(|(_, _, pk)| *pk == content.origin_public_key) {
    return Err(ValidationError::InvalidContent("origin key already registered".into()));
  }
  let Some(root_ca) = ctx.root_ca_keys.get(&content.origin_public_key.origin) else {
    return Err(ValidationError::InvalidContent("no root CA for origin family".into()));
  };
  if !root_ca.verify(&content.origin_public_key.to_prefixed_bytes(), &signature_from_cert(&content.certificate)) {
    return Err(ValidationError::InvalidContent("certificate does not verify".into()));
  }
  Ok(())
}

pub fn validate_oracle(tx: &Transaction, ctx: &ValidationContext) -> Result<(), ValidationError> {
  let content: OracleContent = decode_json(&tx.data.content)?;
  if content.trigger_time != ctx.oracle_schedule {
    return Err(ValidationError::InvalidSchedule);
  }
  Ok(())
}

pub fn validate_code_proposal(tx: &Transaction, _ctx: &ValidationContext) -> Result<(), ValidationError> {
  let _content: CodeProposalContent = decode_json(&tx.data.content)?;
  Ok(())
}

pub fn validate_code_approval(tx: &Transaction, ctx: &ValidationContext) -> Result<(), ValidationError> {
  let _content: CodeApprovalContent = decode_json(&tx.data.content)?;
  if !ctx.technical_council.contains(&tx.address) {
    return Err(ValidationError::Unauthorized);
  }
  Ok(())
}

pub fn validate_mint_rewards(tx: &Transaction, ctx: &ValidationContext) -> Result<(), ValidationError> {
  let supply = tx.data.ledger.total_uco();
  if supply != ctx.last_summary_burned_fees {
    return Err(ValidationError::InvalidSupplyOrDistribution);
  }
  Ok(())
}

pub fn validate_node_rewards(tx: &Transaction, ctx: &ValidationContext) -> Result<(), ValidationError> {
  if tx.data.ledger.uco.len() != ctx.reward_distribution.len() {
    return Err(ValidationError::InvalidSupplyOrDistribution);
  }
  let matches = tx.data.ledger.uco.iter().zip(ctx.reward_distribution.iter()).all(|(declared, expected)| {
    declared.to == expected.to && declared.amount == expected.amount
  });
  if !matches {
    return Err(ValidationError::InvalidSupplyOrDistribution);
  }
  Ok(())
}

pub fn validate_token(tx: &Transaction, _ctx: &ValidationContext) -> Result<(), ValidationError> {
  let content: TokenContent = decode_json(&tx.data.content)?;
  if content.kind == "non-fungible" {
    if content.decimals != 8 {
      return Err(ValidationError::InvalidTokenSpecification("non-fungible tokens require 8 decimals".into()));
    }
    let mut seen = HashSet::new();
    for item in &content.collection {
      if !seen.insert(item.id) {
        return Err(ValidationError::InvalidTokenSpecification("duplicate id in collection".into()));
      }
    }
    let expected_supply = content.collection.len() as u64 * crate::transaction::ledger::UCO_SUBUNITS;
    if content.supply != expected_supply {
      return Err(ValidationError::InvalidTokenSpecification("supply != len(collection) * 10^8".into()));
    }
  } else if !content.collection.is_empty() {
    return Err(ValidationError::InvalidTokenSpecification("fungible tokens must not declare a collection".into()));
  }
  Ok(())
}

pub fn validate_keychain(tx: &Transaction, _ctx: &ValidationContext) -> Result<(), ValidationError> {
  let content: KeychainContent = decode_json(&tx.data.content)?;
  if !content.did_document.is_object() {
    return Err(ValidationError::InvalidContent("did_document must be a JSON object".into()));
  }
  Ok(())
}

pub fn validate_keychain_access(tx: &Transaction, _ctx: &ValidationContext) -> Result<(), ValidationError> {
  if !tx.data.ownerships.iter().any(|o| o.authorizes(&tx.previous_public_key)) {
    return Err(ValidationError::Unauthorized);
  }
  Ok(())
}

impl TransactionType {
  /// Dispatches to the per-class acceptance rule.
  pub fn validate_content(&self, tx: &Transaction, ctx: &ValidationContext) -> Result<(), ValidationError> {
    use TransactionType::*;
    match self {
      Node => validate_node(tx, ctx),
      NodeSharedSecrets => validate_node_shared_secrets(tx, ctx),
      Origin => validate_origin(tx, ctx),
      Oracle | OracleSummary => validate_oracle(tx, ctx),
      CodeProposal => validate_code_proposal(tx, ctx),
      CodeApproval => validate_code_approval(tx, ctx),
      MintRewards => validate_mint_rewards(tx, ctx),
      NodeRewards => validate_node_rewards(tx, ctx),
      Token => validate_token(tx, ctx),
      Keychain => validate_keychain(tx, ctx),
      KeychainAccess => validate_keychain_access(tx, ctx),
      Transfer | Beacon => Ok(()),
    }
  }
}

/// Full pending-transaction admission filter.
pub fn validate_pending_transaction(tx: &Transaction, ctx: &ValidationContext) -> Result<(), ValidationError> {
  validate_universal(tx, ctx)?;
  tx.tx_type.validate_content(tx, ctx)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{Keypair, OriginId, Timestamp};
  use crate::transaction::TransactionData;

  fn beacon_tx(previous: &Keypair) -> Transaction {
    let address = Address::from_public_key(&previous.public(), crate::primitives::HashAlgo::Sha3_256);
    let mut tx = Transaction {
      address,
      tx_type: TransactionType::Beacon,
      timestamp: Timestamp::from_micros(1_700_000_000_000_000),
      data: TransactionData::default(),
      previous_public_key: previous.public(),
      previous_signature: crate::primitives::Signature::from_bytes([0u8; 64]),
      origin_signature: crate::primitives::Signature::from_bytes([0u8; 64]),
      validation_stamp: None,
      cross_validation_stamps: vec![],
    };
    tx.previous_signature = previous.sign(&tx.pending_bytes());
    let to_sign = tx.previous_signed_bytes();
    tx.origin_signature = previous.sign(&to_sign);
    tx
  }

  fn ctx_with_genesis<'a>(
    genesis: &'a HashMap<NetworkChainKind, Address>,
    root_ca: &'a HashMap<OriginId, PublicKey>,
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
  fn network_chain_continuity_accepts_a_recognized_genesis() {
    let previous = Keypair::from_seed(&[0x40; 32], OriginId::Software);
    let tx = beacon_tx(&previous);
    let genesis_address = Address::from_public_key(&previous.public(), crate::primitives::HashAlgo::Sha3_256);
    let mut genesis = HashMap::new();
    genesis.insert(NetworkChainKind::Beacon, genesis_address);
    let root_ca = HashMap::new();
    assert!(validate_network_chain_continuity(&tx, &ctx_with_genesis(&genesis, &root_ca)).is_ok());
  }

  #[test]
  fn network_chain_continuity_rejects_an_unknown_genesis() {
    let previous = Keypair::from_seed(&[0x41; 32], OriginId::Software);
    let tx = beacon_tx(&previous);
    let genesis = HashMap::new();
    let root_ca = HashMap::new();
    assert_eq!(
      validate_network_chain_continuity(&tx, &ctx_with_genesis(&genesis, &root_ca)),
      Err(ValidationError::InvalidNetworkChain)
    );
  }
}
