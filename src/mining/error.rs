use crate::network::NetworkError;
use crate::transaction::InconsistencyKind;
use crate::validation::ValidationError;
use thiserror::Error;

/// The mining-wide error taxonomy (§7): every terminal reason a
/// workflow can end in, surfaced up to the welcome node as a
/// [`crate::network::message::WireMessage::Error`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
  #[error("pending validation rejected the transaction: {0}")]
  InvalidTransaction(#[from] ValidationError),
  #[error("committee does not match the recomputed election")]
  InvalidElection,
  #[error("cross-validation found inconsistencies: {0:?}")]
  Inconsistency(Vec<InconsistencyKind>),
  #[error("insufficient storage acknowledgments before the deadline")]
  ReplicationTimeout,
  #[error("network transport failure: {0}")]
  NetworkIssue(#[from] NetworkError),
  #[error("an ownership-based secret could not be recovered by this node")]
  TransactionSeedDecryption,
  #[error("transaction already committed")]
  AlreadyExists,
}
