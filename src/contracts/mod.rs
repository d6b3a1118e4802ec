//! Contract-level interaction: ABI bindings, constants, parameter types, transaction
//! builders, EIP-712 proposals and on-chain hashing helpers.
//!
//! Everything here is pure. Network access lives in [`crate::rpc`] and the sub-clients.

pub mod abi;
pub mod calls;
pub mod constants;
pub mod hashing;
pub mod proposal;
pub mod types;

pub use abi::{IAIOracleAdapter, IMarketFactory, IPoolMarket, IResolutionModule};
pub use calls::*;
pub use constants::*;
pub use hashing::{evidence_hash, position_key, question_hash};
pub use proposal::{parse_signature_hex, proposal_domain, ProposalParams, SignedProposal};
pub use types::*;
