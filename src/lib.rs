pub mod crypto;
pub mod election;
pub mod fee;
pub mod mining;
pub mod network;
pub mod oracle;
pub mod primitives;
pub mod replication;
pub mod roster;
pub mod storage;
pub mod transaction;
pub mod validation;

#[cfg(test)]
pub mod test;
