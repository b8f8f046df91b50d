use crate::primitives::{Digest, PublicKey};
use crate::transaction::Transaction;

/// Derives the per-transaction *sorting seed* from a daily-nonce (or
/// storage-nonce) secret and the transaction itself, so the committee
/// cannot be pre-computed by a non-validator that doesn't hold that
/// secret.
pub fn sorting_seed(tx: &Transaction, nonce_seed: &[u8]) -> Digest {
  let mut buf = Vec::with_capacity(nonce_seed.len() + 64);
  buf.extend_from_slice(nonce_seed);
  buf.extend_from_slice(&tx.address.digest.bytes);
  Digest::sha3_256(&buf)
}

/// A candidate's rendezvous score for this transaction: nodes are
/// ordered by this value ascending.
pub fn score(node_public_key: &PublicKey, seed: &Digest) -> Digest {
  let mut buf = node_public_key.to_prefixed_bytes();
  buf.extend_from_slice(&seed.bytes);
  Digest::sha3_256(&buf)
}
