pub mod inmemory;
pub mod sled_store;

use crate::primitives::{Address, PublicKey};
use crate::transaction::{Transaction, TransactionType};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("serialization error: {0}")]
  Serialization(#[from] std::io::Error),

  #[error("storage engine error: {0}")]
  StorageEngine(#[from] sled::Error),

  #[error("transaction chain for address not found")]
  NotFound,
}

/// Durable per-address transaction-chain storage: a validated or
/// replicated transaction is appended under `tx.address`, queryable by
/// type (for network-chain continuity) and by chain position.
#[async_trait]
pub trait TransactionStore: Send + Sync {
  async fn get_transaction(&self, address: &Address) -> Result<Option<Transaction>, StoreError>;
  async fn write_transaction(&self, tx: &Transaction) -> Result<(), StoreError>;
  async fn chain_size(&self, public_key: &PublicKey) -> Result<u64, StoreError>;
  async fn list_addresses_by_type(&self, tx_type: TransactionType) -> Result<Vec<Address>, StoreError>;
  async fn get_last_chain_address(&self, public_key: &PublicKey) -> Result<Option<Address>, StoreError>;
  async fn get_first_chain_address(&self, public_key: &PublicKey) -> Result<Option<Address>, StoreError>;
}
