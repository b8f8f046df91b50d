use super::{StoreError, TransactionStore};
use crate::primitives::{Address, PublicKey};
use crate::transaction::{Transaction, TransactionType};
use async_trait::async_trait;
use dashmap::DashMap;

/// A `TransactionStore` backed by in-process maps, used by tests and by
/// the standalone single-node workflow path where nothing needs to
/// survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
  transactions: DashMap<String, Transaction>,
  chains: DashMap<Vec<u8>, Vec<Address>>,
  by_type: DashMap<String, Vec<Address>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
  async fn get_transaction(&self, address: &Address) -> Result<Option<Transaction>, StoreError> {
    Ok(self.transactions.get(&address.to_b58()).map(|e| e.clone()))
  }

  async fn write_transaction(&self, tx: &Transaction) -> Result<(), StoreError> {
    self.transactions.insert(tx.address.to_b58(), tx.clone());
    self
      .chains
      .entry(tx.previous_public_key.as_bytes().to_vec())
      .or_default()
      .push(tx.address.clone());
    self.by_type.entry(format!("{:?}", tx.tx_type)).or_default().push(tx.address.clone());
    Ok(())
  }

  async fn chain_size(&self, public_key: &PublicKey) -> Result<u64, StoreError> {
    Ok(self.chains.get(public_key.as_bytes().as_slice()).map(|e| e.len() as u64).unwrap_or(0))
  }

  async fn list_addresses_by_type(&self, tx_type: TransactionType) -> Result<Vec<Address>, StoreError> {
    Ok(self.by_type.get(&format!("{:?}", tx_type)).map(|e| e.clone()).unwrap_or_default())
  }

  async fn get_last_chain_address(&self, public_key: &PublicKey) -> Result<Option<Address>, StoreError> {
    Ok(self.chains.get(public_key.as_bytes().as_slice()).and_then(|e| e.last().cloned()))
  }

  async fn get_first_chain_address(&self, public_key: &PublicKey) -> Result<Option<Address>, StoreError> {
    Ok(self.chains.get(public_key.as_bytes().as_slice()).and_then(|e| e.first().cloned()))
  }
}
