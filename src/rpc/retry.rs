//! Retry policies for JSON-RPC reads.
//!
//! Transactions are never retried: a resend after an ambiguous failure can double-submit.

use std::time::Duration;

use alloy::transports::{RpcError, TransportError};

/// JSON-RPC / HTTP code nodes and gateways use for rate limiting.
pub const RATE_LIMITED_CODE: i64 = 429;

/// Retry policy for an RPC read.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// No retries. Errors propagate as returned by the node.
    #[default]
    None,
    /// Retry on transport failures and rate limiting, with backoff.
    Idempotent,
    /// User-provided retry logic.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// Resolve to a concrete config, `None` when retries are disabled.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(c) => Some(c.clone()),
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Whether to add jitter to the delay.
    pub jitter: bool,
    /// JSON-RPC error codes that trigger a retry.
    pub retryable_codes: Vec<i64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_codes: vec![],
        }
    }
}

impl RetryConfig {
    /// The default config for idempotent reads.
    pub fn idempotent() -> Self {
        Self {
            retryable_codes: vec![RATE_LIMITED_CODE],
            ..Self::default()
        }
    }

    /// Calculate delay for a given attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }

    /// Whether `error` is worth another attempt under this config.
    pub fn should_retry(&self, error: &TransportError) -> bool {
        match error {
            RpcError::Transport(_) => true,
            RpcError::ErrorResp(payload) => self.retryable_codes.contains(&payload.code),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy::transports::TransportErrorKind;

    fn error_resp(code: i64) -> TransportError {
        RpcError::ErrorResp(ErrorPayload {
            code,
            message: "boom".into(),
            data: None,
        })
    }

    #[test]
    fn test_retry_policy_default_is_none() {
        assert!(matches!(RetryPolicy::default(), RetryPolicy::None));
        assert!(RetryPolicy::None.config().is_none());
    }

    #[test]
    fn test_retry_config_idempotent_includes_429() {
        let config = RetryConfig::idempotent();
        assert!(config.retryable_codes.contains(&429));
        assert_eq!(config.max_retries, 3);
        assert!(RetryPolicy::Idempotent.config().is_some());
    }

    #[test]
    fn test_retry_config_delay_for_attempt_no_jitter() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            jitter: false,
            ..RetryConfig::default()
        };
        assert_eq!(config.delay_for_attempt(0).as_millis(), 100);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 200);
        assert_eq!(config.delay_for_attempt(2).as_millis(), 400);
    }

    #[test]
    fn test_retry_config_delay_caps_at_max() {
        let config = RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(2000),
            backoff_factor: 10.0,
            jitter: false,
            retryable_codes: vec![],
        };
        assert_eq!(config.delay_for_attempt(3).as_millis(), 2000);
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(1000),
            ..RetryConfig::default()
        };
        for _ in 0..50 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((750..=1250).contains(&ms), "delay {}", ms);
        }
    }

    #[test]
    fn test_should_retry_classification() {
        let config = RetryConfig::idempotent();
        assert!(config.should_retry(&error_resp(429)));
        assert!(!config.should_retry(&error_resp(3)));
        assert!(!config.should_retry(&error_resp(-32000)));
        assert!(config.should_retry(&TransportErrorKind::backend_gone()));
        assert!(!config.should_retry(&RpcError::NullResp));
    }
}
