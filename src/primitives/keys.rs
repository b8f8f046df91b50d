use super::{
  curve::{CurveError, CurveId, HashAlgo, OriginId},
  hash::Digest,
};
use borsh::{BorshDeserialize, BorshSerialize};
use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A public key, prefixed on the wire by a 1-byte curve id and a 1-byte
/// origin id. Only Ed25519 is implemented; the prefix bytes
/// exist so other curves slot in without changing message framing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
  pub curve: CurveId,
  pub origin: OriginId,
  bytes: [u8; 32],
}

impl PublicKey {
  pub fn new(curve: CurveId, origin: OriginId, bytes: [u8; 32]) -> Self {
    Self { curve, origin, bytes }
  }

  pub fn as_bytes(&self) -> &[u8; 32] {
    &self.bytes
  }

  /// The full prefixed wire representation: `curve || origin || bytes`.
  pub fn to_prefixed_bytes(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(34);
    out.push(self.curve as u8);
    out.push(self.origin as u8);
    out.extend_from_slice(&self.bytes);
    out
  }

  pub fn from_prefixed_bytes(data: &[u8]) -> Result<Self, KeyError> {
    if data.len() != 34 {
      return Err(KeyError::BadLength(data.len()));
    }
    let curve = CurveId::from_byte(data[0])?;
    let origin = OriginId::from_byte(data[1])?;
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&data[2..34]);
    Ok(Self { curve, origin, bytes })
  }

  pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
    match self.curve {
      CurveId::Ed25519 => {
        let vk = match ed25519_dalek::PublicKey::from_bytes(&self.bytes) {
          Ok(vk) => vk,
          Err(_) => return false,
        };
        let sig = match ed25519_dalek::Signature::from_bytes(&signature.0) {
          Ok(sig) => sig,
          Err(_) => return false,
        };
        vk.verify(message, &sig).is_ok()
      }
    }
  }

  pub fn to_b58(&self) -> String {
    bs58::encode(self.to_prefixed_bytes()).into_string()
  }
}

impl std::fmt::Debug for PublicKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_b58())
  }
}

impl std::fmt::Display for PublicKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_b58())
  }
}

impl BorshSerialize for PublicKey {
  fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
    writer.write_all(&self.to_prefixed_bytes())
  }
}

impl BorshDeserialize for PublicKey {
  fn deserialize(buf: &mut &[u8]) -> std::io::Result<Self> {
    if buf.len() < 34 {
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "short public key"));
    }
    let (head, rest) = buf.split_at(34);
    let pk = PublicKey::from_prefixed_bytes(head)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    *buf = rest;
    Ok(pk)
  }
}

/// A signature, opaque on the wire beyond its curve's fixed length.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature([u8; 64]);

impl Signature {
  pub fn from_bytes(bytes: [u8; 64]) -> Self {
    Self(bytes)
  }

  pub fn to_bytes(&self) -> [u8; 64] {
    self.0
  }

  pub fn to_b58(&self) -> String {
    bs58::encode(self.0).into_string()
  }
}

impl std::fmt::Debug for Signature {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Signature({})", self.to_b58())
  }
}

impl BorshSerialize for Signature {
  fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
    writer.write_all(&self.0)
  }
}

impl BorshDeserialize for Signature {
  fn deserialize(buf: &mut &[u8]) -> std::io::Result<Self> {
    if buf.len() < 64 {
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "short signature"));
    }
    let (head, rest) = buf.split_at(64);
    let mut bytes = [0u8; 64];
    bytes.copy_from_slice(head);
    *buf = rest;
    Ok(Self(bytes))
  }
}

/// An address: `hash(previous_public_key)`, prefixed by a 1-byte curve id
/// and a 1-byte hash-algorithm id ahead of the digest.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
  pub curve: CurveId,
  pub digest: Digest,
}

impl Address {
  pub fn from_public_key(pk: &PublicKey, algo: HashAlgo) -> Self {
    let digest = match algo {
      HashAlgo::Sha3_256 => Digest::sha3_256(&pk.to_prefixed_bytes()),
    };
    Self { curve: pk.curve, digest }
  }

  pub fn to_b58(&self) -> String {
    let mut out = vec![self.curve as u8, self.digest.algo as u8];
    out.extend_from_slice(&self.digest.bytes);
    bs58::encode(out).into_string()
  }
}

impl std::fmt::Debug for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_b58())
  }
}

impl BorshSerialize for Address {
  fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
    (self.curve as u8).serialize(writer)?;
    (self.digest.algo as u8).serialize(writer)?;
    self.digest.bytes.serialize(writer)
  }
}

impl BorshDeserialize for Address {
  fn deserialize(buf: &mut &[u8]) -> std::io::Result<Self> {
    let curve = CurveId::from_byte(u8::deserialize(buf)?)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let algo = HashAlgo::from_byte(u8::deserialize(buf)?)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let bytes = Vec::<u8>::deserialize(buf)?;
    Ok(Self { curve, digest: Digest { algo, bytes } })
  }
}

/// A keypair able to sign on behalf of its public key. No raw secret
/// bytes ever leave a `Keypair` except through [`Keypair::sign`]; the
/// node-wide [`crate::crypto::Keystore`] is the only place that holds a
/// table of these.
pub struct Keypair {
  secret: ed25519_dalek::Keypair,
  origin: OriginId,
}

impl Keypair {
  pub fn generate<R: rand::RngCore + rand::CryptoRng>(rng: &mut R, origin: OriginId) -> Self {
    Self { secret: ed25519_dalek::Keypair::generate(rng), origin }
  }

  pub fn from_seed(seed: &[u8; 32], origin: OriginId) -> Self {
    let secret = ed25519_dalek::SecretKey::from_bytes(seed).expect("32 bytes is a valid seed");
    let public = ed25519_dalek::PublicKey::from(&secret);
    Self { secret: ed25519_dalek::Keypair { secret, public }, origin }
  }

  pub fn public(&self) -> PublicKey {
    PublicKey::new(CurveId::Ed25519, self.origin, self.secret.public.to_bytes())
  }

  pub fn sign(&self, message: &[u8]) -> Signature {
    Signature::from_bytes(self.secret.sign(message).to_bytes())
  }
}

impl Clone for Keypair {
  fn clone(&self) -> Self {
    Self {
      secret: ed25519_dalek::Keypair::from_bytes(&self.secret.to_bytes()).unwrap(),
      origin: self.origin,
    }
  }
}

impl std::fmt::Debug for Keypair {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("Keypair").field(&self.public()).finish()
  }
}

#[derive(Debug, Error)]
pub enum KeyError {
  #[error("invalid key length: {0}")]
  BadLength(usize),
  #[error(transparent)]
  Curve(#[from] CurveError),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sign_and_verify_roundtrip() {
    let kp = Keypair::from_seed(&[7u8; 32], OriginId::Software);
    let sig = kp.sign(b"hello mining");
    assert!(kp.public().verify(b"hello mining", &sig));
    assert!(!kp.public().verify(b"tampered", &sig));
  }

  #[test]
  fn address_is_deterministic() {
    let kp = Keypair::from_seed(&[3u8; 32], OriginId::OnChain);
    let a1 = Address::from_public_key(&kp.public(), HashAlgo::Sha3_256);
    let a2 = Address::from_public_key(&kp.public(), HashAlgo::Sha3_256);
    assert_eq!(a1, a2);
  }
}
