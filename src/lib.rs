//! # oracle-markets
//!
//! Rust SDK for the AI-oracle prediction market contracts: the oracle adapter that accepts
//! signed outcome proposals, the market factory, the per-market pool AMM and the bonded
//! resolution module.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: ABI bindings, constants, parameter types, EIP-712 proposals, tick math,
//!    domain records (pure, no I/O)
//! 2. **RPC**: `RpcCaller`, typed `eth_call`, transaction submission and read retry policies
//! 3. **Events**: decoded logs, topic filters, historical queries and subscription watchers
//! 4. **High-Level Client**: `OracleMarketsClient` with nested sub-clients and caching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oracle_markets::prelude::*;
//!
//! let client = OracleMarketsClient::builder()
//!     .rpc_url("ws://127.0.0.1:8545")
//!     .deployment(Deployment::from_json_file("deployment.json")?)
//!     .build()
//!     .await?;
//!
//! let market = client.factory().get_market(MarketId::new(1)).await?;
//! let snapshot = client.pool(market.amm).snapshot().await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, tick math and decimal scaling.
pub mod shared;

/// Contract bindings: ABIs, constants, parameter types, call builders, proposals.
pub mod contracts;

/// Domain modules (vertical slices): records, conversions, sub-clients, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Chain id and endpoint constants.
pub mod network;

/// Deployment configuration.
pub mod config;

// ── Layer 2: RPC ─────────────────────────────────────────────────────────────

/// JSON-RPC caller with retry policies.
pub mod rpc;

// ── Layer 3: Events ──────────────────────────────────────────────────────────

/// Typed events, log queries and watchers.
pub mod events;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `OracleMarketsClient`, the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes and math
    pub use crate::shared::{
        from_base_units, now_timestamp, to_base_units, MarketId, OutcomeId,
        ProposalId, MAX_TICK, MIN_TICK,
    };

    // Contracts
    pub use crate::contracts::{
        evidence_hash, position_key, question_hash, BurnParams, CollectParams,
        CreateMarketParams, MarketStatus, MintParams, ProposalParams, ResolutionState,
        SignedProposal, SwapParams,
    };
    pub use crate::contracts::{IAIOracleAdapter, IMarketFactory, IPoolMarket, IResolutionModule};

    // Domain types
    pub use crate::domain::factory::state::{MarketRegistry, RegistryEntry};
    pub use crate::domain::factory::{CreatedMarket, Market};
    pub use crate::domain::oracle::{AcceptedProposal, OracleConfig};
    pub use crate::domain::pool::{PoolInfo, PoolSnapshot, PositionInfo, Slot0, TickInfo};
    pub use crate::domain::resolution::{Resolution, ResolutionParams};

    // Events
    pub use crate::events::{
        DecodedLog, EventStream, LogQuery, ProtocolEvent, WatchConfig, WatchHandle,
    };

    // Errors
    pub use crate::error::{ConfigError, SdkError, SdkResult, WatchError};

    // Config + network
    pub use crate::config::Deployment;
    pub use crate::network::{DEFAULT_RPC_URL, DEFAULT_WS_URL};

    // Client + sub-clients
    pub use crate::client::{
        MarketsClient, OracleClient, OracleMarketsClient, OracleMarketsClientBuilder, PoolClient,
        ResolutionsClient,
    };
    pub use crate::rpc::retry::{RetryConfig, RetryPolicy};
}
