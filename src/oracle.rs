//! The UCO price oracle collaborator the fee engine reads from. Real
//! oracle computation (summarizing `oracle`/`oracle_summary`
//! transactions into a price) is out of scope; this is the narrow
//! contract the coordinator and cross-validators call to get the price
//! they feed into [`crate::fee::calculate_fee`].

use crate::primitives::Timestamp;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UcoPrice {
  pub eur: f64,
  pub usd: f64,
}

#[async_trait]
pub trait UcoPriceOracle: Send + Sync {
  async fn get_uco_price(&self, at: Timestamp) -> UcoPrice;
}

/// A fixed price, used by tests and by the standalone/bootstrap
/// workflow before a real oracle chain has any history to summarize.
#[derive(Debug, Clone, Copy)]
pub struct FixedPriceOracle(pub UcoPrice);

impl FixedPriceOracle {
  pub fn usd(usd: f64) -> Self {
    Self(UcoPrice { eur: usd * 0.92, usd })
  }
}

#[async_trait]
impl UcoPriceOracle for FixedPriceOracle {
  async fn get_uco_price(&self, _at: Timestamp) -> UcoPrice {
    self.0
  }
}
