use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// A fixed-length bit vector indexed by the canonical sort of a node
/// roster at a given transaction's timestamp. Used for P2P-availability
/// views and for replication-tree rows.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Bitset(Vec<bool>);

impl Bitset {
  pub fn zeros(len: usize) -> Self {
    Self(vec![false; len])
  }

  pub fn from_bits(bits: Vec<bool>) -> Self {
    Self(bits)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, idx: usize) -> bool {
    self.0.get(idx).copied().unwrap_or(false)
  }

  pub fn set(&mut self, idx: usize, value: bool) {
    self.0[idx] = value;
  }

  pub fn count_ones(&self) -> usize {
    self.0.iter().filter(|b| **b).count()
  }

  pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
    self.0.iter().copied()
  }

  /// Conservative AND-merge of several availability views: a node is
  /// considered available only if every contributing view agrees.
  pub fn and_merge<'a>(views: impl Iterator<Item = &'a Bitset>) -> Option<Bitset> {
    let mut acc: Option<Bitset> = None;
    for view in views {
      acc = Some(match acc {
        None => view.clone(),
        Some(prev) => {
          assert_eq!(prev.len(), view.len(), "availability views must share a roster length");
          Bitset(prev.0.iter().zip(view.0.iter()).map(|(a, b)| *a && *b).collect())
        }
      });
    }
    acc
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn and_merge_is_conservative() {
    let a = Bitset::from_bits(vec![true, true, false]);
    let b = Bitset::from_bits(vec![true, false, false]);
    let merged = Bitset::and_merge([&a, &b].into_iter()).unwrap();
    assert_eq!(merged.iter().collect::<Vec<_>>(), vec![true, false, false]);
  }
}
