//! End-to-end mining scenarios (spec.md §8 S1-S6), assembled purely from
//! the in-memory collaborators ([`crate::network::memory::InMemoryNetwork`],
//! [`crate::storage::inmemory::InMemoryStore`], [`crate::oracle::FixedPriceOracle`])
//! so the whole coordinator/cross-validator protocol runs in-process
//! without a real transport or disk.

pub mod harness;
