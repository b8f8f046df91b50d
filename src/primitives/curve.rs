use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Elliptic curve backing a key. The wire format reserves one byte for
/// this tag so additional curves are a match arm away, never a breaking
/// change to already-serialized keys.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum CurveId {
  Ed25519 = 0,
}

impl CurveId {
  pub fn from_byte(b: u8) -> Result<Self, CurveError> {
    match b {
      0 => Ok(Self::Ed25519),
      other => Err(CurveError::UnknownCurve(other)),
    }
  }
}

/// Which family of key custody produced an origin key, used to gate
/// `node` transactions to an allowed set of origins (software wallet,
/// hardware token, on-chain delegated key, ...).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum OriginId {
  OnChain = 0,
  Software = 1,
  Tpm = 2,
  Usb = 3,
}

impl OriginId {
  pub fn from_byte(b: u8) -> Result<Self, CurveError> {
    match b {
      0 => Ok(Self::OnChain),
      1 => Ok(Self::Software),
      2 => Ok(Self::Tpm),
      3 => Ok(Self::Usb),
      other => Err(CurveError::UnknownOrigin(other)),
    }
  }
}

/// Digest algorithm backing an address, one byte on the wire like
/// [`CurveId`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  BorshSerialize,
  BorshDeserialize,
  Serialize,
  Deserialize,
)]
#[repr(u8)]
pub enum HashAlgo {
  Sha3_256 = 0,
}

impl HashAlgo {
  pub fn from_byte(b: u8) -> Result<Self, CurveError> {
    match b {
      0 => Ok(Self::Sha3_256),
      other => Err(CurveError::UnknownHashAlgo(other)),
    }
  }
}

#[derive(Debug, Error)]
pub enum CurveError {
  #[error("unknown curve id: {0}")]
  UnknownCurve(u8),
  #[error("unknown origin id: {0}")]
  UnknownOrigin(u8),
  #[error("unknown hash algorithm id: {0}")]
  UnknownHashAlgo(u8),
}
