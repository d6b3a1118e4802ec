//! Domain modules organized as vertical slices, one per contract.
//!
//! Each sub-module contains:
//! - `mod.rs`: domain records (native Rust types, validated enums)
//! - `convert.rs`: conversions from the ABI structs returned by `sol!`
//! - `client.rs`: sub-client with reads, transactions, log queries and watchers
//! - `state.rs`: event-driven state containers (where useful)

pub mod factory;
pub mod oracle;
pub mod pool;
pub mod resolution;
