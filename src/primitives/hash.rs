use super::curve::HashAlgo;
use borsh::{BorshDeserialize, BorshSerialize};
use multihash::{Hasher, Sha3_256};
use serde::{Deserialize, Serialize};

/// A hash-algorithm-tagged digest, used both for addresses and for the
/// proof-of-integrity chain. Unlike a bare `[u8; 32]` this carries the
/// algorithm it was produced with, so a chain can in principle mix
/// algorithms across epochs without breaking equality checks.
#[derive(
  Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Digest {
  pub algo: HashAlgo,
  pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Digest {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Digest({})", bs58::encode(&self.bytes).into_string())
  }
}

impl Digest {
  pub fn sha3_256(data: &[u8]) -> Self {
    let mut hasher = Sha3_256::default();
    hasher.update(data);
    Self { algo: HashAlgo::Sha3_256, bytes: hasher.finalize().to_vec() }
  }

  pub fn to_b58(&self) -> String {
    bs58::encode(&self.bytes).into_string()
  }
}

/// `POI_n = hash(serialize(tx_n_pending) || POI_{n-1})`, or
/// `hash(serialize(tx_pending))` for the genesis of a chain.
pub fn proof_of_integrity(pending_bytes: &[u8], previous: Option<&Digest>) -> Digest {
  match previous {
    None => Digest::sha3_256(pending_bytes),
    Some(prev) => {
      let mut buf = Vec::with_capacity(pending_bytes.len() + prev.bytes.len());
      buf.extend_from_slice(pending_bytes);
      buf.extend_from_slice(&prev.bytes);
      Digest::sha3_256(&buf)
    }
  }
}
