use crate::primitives::{PublicKey, Timestamp};
use serde::{Deserialize, Serialize};

/// An entry in the authorized-node roster. The same type stands for both
/// validator candidates and storage candidates, both drawn from the
/// current authorized-node roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
  pub public_key: PublicKey,
  pub authorization_date: Timestamp,
  pub geo_patch: String,
  pub ip: std::net::IpAddr,
  pub port: u16,
}

impl Node {
  pub fn new(
    public_key: PublicKey,
    authorization_date: Timestamp,
    geo_patch: impl Into<String>,
    ip: std::net::IpAddr,
    port: u16,
  ) -> Self {
    Self { public_key, authorization_date, geo_patch: geo_patch.into(), ip, port }
  }
}
