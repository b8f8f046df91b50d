pub mod b58;
pub mod bitset;
pub mod curve;
pub mod hash;
pub mod keys;
pub mod time;

pub use b58::ToBase58String;
pub use bitset::Bitset;
pub use curve::{CurveError, CurveId, HashAlgo, OriginId};
pub use hash::Digest;
pub use keys::{Address, KeyError, Keypair, PublicKey, Signature};
pub use time::Timestamp;
