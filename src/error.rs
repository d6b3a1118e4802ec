//! Unified SDK error types.

use thiserror::Error;

use crate::shared::scaling::ScalingError;
use crate::shared::tick_math::TickError;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("RPC error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("Pending transaction error: {0}")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy::sol_types::Error),

    #[error("Signer error: {0}")]
    Signer(#[from] alloy::signers::Error),

    #[error("Signature error: {0}")]
    Signature(#[from] alloy::primitives::SignatureError),

    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scaling error: {0}")]
    Scaling(#[from] ScalingError),

    #[error("Tick error: {0}")]
    Tick(#[from] TickError),

    #[error("Invalid {kind} value: {value}")]
    InvalidEnum { kind: &'static str, value: u8 },

    #[error("Value out of range for {field}: {value}")]
    OutOfRange { field: &'static str, value: String },

    #[error("Transaction {0} reverted")]
    TransactionReverted(alloy::primitives::B256),

    #[error("Expected event {event} not found in receipt of {tx_hash}")]
    MissingEvent {
        event: &'static str,
        tx_hash: alloy::primitives::B256,
    },

    #[error("No signer configured: transactions require a wallet-enabled client")]
    MissingSigner,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Event watcher errors.
#[derive(Error, Debug, Clone)]
pub enum WatchError {
    #[error("Subscription closed by the node")]
    SubscriptionClosed,

    #[error("Subscription failed: {0}")]
    SubscribeFailed(String),

    #[error("Failed to decode {event} log: {reason}")]
    Decode { event: &'static str, reason: String },

    #[error("Watcher task aborted")]
    Aborted,
}

/// Deployment / client configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Missing RPC URL")]
    MissingRpcUrl,

    #[error("Missing deployment")]
    MissingDeployment,
}

/// Result type alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;
