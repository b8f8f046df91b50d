use crate::primitives::{Keypair, OriginId, PublicKey, Signature, Timestamp};
use parking_lot::RwLock;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Deterministically derives a child seed from a root seed and an index,
/// the way an HD-wallet derives child keys: `sha3_256(root || idx)` fed
/// into a `ChaCha20Rng` so the same (root, idx) pair always yields the
/// same keypair, with no state shared across indices.
pub fn derive(root_seed: &[u8; 32], idx: u64) -> Keypair {
  let mut material = root_seed.to_vec();
  material.extend_from_slice(&idx.to_le_bytes());
  let digest = crate::primitives::Digest::sha3_256(&material);
  let mut seed = [0u8; 32];
  seed.copy_from_slice(&digest.bytes[..32]);
  let mut rng = ChaCha20Rng::from_seed(seed);
  Keypair::generate(&mut rng, OriginId::Software)
}

struct DailyMaterial {
  day_index: i64,
  nonce_seed: [u8; 32],
  keypair: Keypair,
}

fn day_index_for(now: Timestamp) -> i64 {
  now.as_micros().div_euclid(24 * 60 * 60 * 1_000_000)
}

fn derive_daily(root_seed: &[u8; 32], day_index: i64) -> ([u8; 32], Keypair) {
  let keypair = derive(root_seed, day_index as u64);
  let mut nonce_material = root_seed.to_vec();
  nonce_material.extend_from_slice(b"daily-nonce");
  nonce_material.extend_from_slice(&day_index.to_le_bytes());
  let digest = crate::primitives::Digest::sha3_256(&nonce_material);
  let mut nonce_seed = [0u8; 32];
  nonce_seed.copy_from_slice(&digest.bytes[..32]);
  (nonce_seed, keypair)
}

/// Holds a node's permanent keypair plus the rotating daily node-shared-secret
/// key a coordinator signs `ValidationStamp`s with. Rotation is driven
/// explicitly by [`Keystore::rotate_if_needed`] rather than a background
/// timer, so tests can step the clock deterministically.
pub struct Keystore {
  node_keypair: Keypair,
  root_seed: [u8; 32],
  daily: RwLock<DailyMaterial>,
}

impl Keystore {
  pub fn new(node_keypair: Keypair, root_seed: [u8; 32], now: Timestamp) -> Self {
    let day_index = day_index_for(now);
    let (nonce_seed, keypair) = derive_daily(&root_seed, day_index);
    Self { node_keypair, root_seed, daily: RwLock::new(DailyMaterial { day_index, nonce_seed, keypair }) }
  }

  /// Re-derives the daily key/nonce if `now` has crossed into a new day
  /// since the last rotation. Returns whether a rotation happened.
  pub fn rotate_if_needed(&self, now: Timestamp) -> bool {
    let day_index = day_index_for(now);
    if self.daily.read().day_index == day_index {
      return false;
    }
    let (nonce_seed, keypair) = derive_daily(&self.root_seed, day_index);
    let mut daily = self.daily.write();
    if daily.day_index == day_index {
      return false;
    }
    *daily = DailyMaterial { day_index, nonce_seed, keypair };
    true
  }

  pub fn node_public_key(&self) -> PublicKey {
    self.node_keypair.public()
  }

  pub fn sign_with_node_key(&self, message: &[u8]) -> Signature {
    self.node_keypair.sign(message)
  }

  pub fn daily_public_key(&self) -> PublicKey {
    self.daily.read().keypair.public()
  }

  /// Signs with the current day's node-shared-secret key, the key a
  /// coordinator's `ValidationStamp` is signed with.
  pub fn sign_with_daily_key(&self, message: &[u8]) -> Signature {
    self.daily.read().keypair.sign(message)
  }

  pub fn daily_nonce_seed(&self) -> [u8; 32] {
    self.daily.read().nonce_seed
  }

  /// Storage-node election seed, deliberately distinct from
  /// [`Keystore::daily_nonce_seed`] so chain-storage placement can't be
  /// derived from knowledge of the committee-election seed alone.
  pub fn storage_nonce_seed(&self) -> [u8; 32] {
    let daily = self.daily.read();
    let mut material = daily.nonce_seed.to_vec();
    material.extend_from_slice(b"storage");
    crate::primitives::Digest::sha3_256(&material).bytes[..32].try_into().unwrap()
  }
}
