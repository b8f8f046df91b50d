use borsh::{BorshDeserialize, BorshSerialize};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Microsecond-precision UTC timestamp. Chains require these to be
/// non-decreasing along their length; that rule is
/// enforced by [`Timestamp::at_least`], not by this type itself.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
  pub fn from_micros(micros: i64) -> Self {
    Self(micros)
  }

  pub fn now() -> Self {
    Self(Utc::now().timestamp_micros())
  }

  pub fn as_micros(&self) -> i64 {
    self.0
  }

  pub fn to_datetime(&self) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(self.0).unwrap_or_else(|| Utc::now())
  }

  /// True if `self >= floor`: the chain-continuity non-decreasing check.
  pub fn at_least(&self, floor: Timestamp) -> bool {
    *self >= floor
  }
}

impl Default for Timestamp {
  fn default() -> Self {
    Self(0)
  }
}

impl std::fmt::Debug for Timestamp {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_datetime().to_rfc3339())
  }
}

impl BorshSerialize for Timestamp {
  fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
    self.0.serialize(writer)
  }
}

impl BorshDeserialize for Timestamp {
  fn deserialize(buf: &mut &[u8]) -> std::io::Result<Self> {
    Ok(Self(i64::deserialize(buf)?))
  }
}
