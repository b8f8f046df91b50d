use thiserror::Error;

/// Kinds of pending-validation failure. `detail` is
/// attached by the caller for the `Error{reason: invalid_transaction}`
/// wire message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("previous_signature does not verify")]
  InvalidPreviousSignature,
  #[error("address does not hash from previous_public_key")]
  InvalidAddress,
  #[error("content exceeds maximum size")]
  ContentTooLarge,
  #[error("content could not be decoded: {0}")]
  InvalidContent(String),
  #[error("schedule does not match expected trigger time")]
  InvalidSchedule,
  #[error("duplicate node registration for this ip/port")]
  DuplicateNode,
  #[error("token specification is invalid: {0}")]
  InvalidTokenSpecification(String),
  #[error("previous_address does not resolve to the network's genesis address")]
  InvalidNetworkChain,
  #[error("smart contract code failed to parse")]
  ContractParseError,
  #[error("signer is not authorized for this operation")]
  Unauthorized,
  #[error("content does not match the expected value for this cycle")]
  InvalidSupplyOrDistribution,
}
