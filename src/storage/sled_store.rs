use super::{StoreError, TransactionStore};
use crate::primitives::{Address, PublicKey};
use crate::transaction::{Transaction, TransactionType};
use async_trait::async_trait;
use std::path::Path;

/// Durable transaction store over three sled trees: transactions keyed
/// by address, a chain index keyed by the identity's first public key
/// (an append-only list of addresses in chain order), and a type index
/// for network-chain continuity lookups.
#[derive(Debug)]
pub struct SledStore {
  transactions: sled::Tree,
  chain_index: sled::Tree,
  type_index: sled::Tree,
}

impl SledStore {
  pub fn new(directory: impl AsRef<Path>) -> Result<Self, StoreError> {
    let db = sled::open(directory)?;
    Ok(Self {
      transactions: db.open_tree("transactions")?,
      chain_index: db.open_tree("chain_index")?,
      type_index: db.open_tree("type_index")?,
    })
  }

  fn chain_key(public_key: &PublicKey) -> Vec<u8> {
    public_key.as_bytes().to_vec()
  }

  fn read_addresses(tree: &sled::Tree, key: impl AsRef<[u8]>) -> Result<Vec<Address>, StoreError> {
    match tree.get(key)? {
      Some(bytes) => Ok(borsh::BorshDeserialize::try_from_slice(&bytes)?),
      None => Ok(Vec::new()),
    }
  }
}

#[async_trait]
impl TransactionStore for SledStore {
  async fn get_transaction(&self, address: &Address) -> Result<Option<Transaction>, StoreError> {
    match self.transactions.get(address.to_b58())? {
      Some(bytes) => Ok(Some(borsh::BorshDeserialize::try_from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  async fn write_transaction(&self, tx: &Transaction) -> Result<(), StoreError> {
    let key = tx.address.to_b58();
    let value = borsh::to_vec(tx)?;
    self.transactions.insert(key.as_bytes(), value)?;

    let chain_key = Self::chain_key(&tx.previous_public_key);
    let mut addresses = Self::read_addresses(&self.chain_index, &chain_key)?;
    addresses.push(tx.address.clone());
    self.chain_index.insert(chain_key, borsh::to_vec(&addresses)?)?;

    let type_key = format!("{:?}", tx.tx_type);
    let mut by_type = Self::read_addresses(&self.type_index, type_key.as_bytes())?;
    by_type.push(tx.address.clone());
    self.type_index.insert(type_key.as_bytes(), borsh::to_vec(&by_type)?)?;

    Ok(())
  }

  async fn chain_size(&self, public_key: &PublicKey) -> Result<u64, StoreError> {
    Ok(Self::read_addresses(&self.chain_index, Self::chain_key(public_key))?.len() as u64)
  }

  async fn list_addresses_by_type(&self, tx_type: TransactionType) -> Result<Vec<Address>, StoreError> {
    Self::read_addresses(&self.type_index, format!("{:?}", tx_type).as_bytes())
  }

  async fn get_last_chain_address(&self, public_key: &PublicKey) -> Result<Option<Address>, StoreError> {
    Ok(Self::read_addresses(&self.chain_index, Self::chain_key(public_key))?.pop())
  }

  async fn get_first_chain_address(&self, public_key: &PublicKey) -> Result<Option<Address>, StoreError> {
    Ok(Self::read_addresses(&self.chain_index, Self::chain_key(public_key))?.into_iter().next())
  }
}
