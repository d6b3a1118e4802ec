//! Deployment configuration: where the protocol contracts live on a given chain.
//!
//! Pool (AMM) addresses are per market and are discovered through the factory,
//! so only the three singleton contracts are configured here.

use std::path::Path;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Addresses of a protocol deployment.
///
/// JSON form:
///
/// ```json
/// {
///   "chainId": 84532,
///   "oracleAdapter": "0x…",
///   "marketFactory": "0x…",
///   "resolutionModule": "0x…",
///   "deploymentBlock": 1234567
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub chain_id: u64,
    pub oracle_adapter: Address,
    pub market_factory: Address,
    pub resolution_module: Address,
    /// First block worth scanning for protocol logs.
    #[serde(default)]
    pub deployment_block: Option<u64>,
}

impl Deployment {
    /// Parse and validate a deployment from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let deployment: Deployment =
            serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        deployment.validate()?;
        Ok(deployment)
    }

    /// Read, parse and validate a deployment JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    /// Reject zero addresses and a zero chain id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id == 0 {
            return Err(ConfigError::Invalid("chainId must be non-zero".to_string()));
        }
        for (name, address) in [
            ("oracleAdapter", self.oracle_adapter),
            ("marketFactory", self.market_factory),
            ("resolutionModule", self.resolution_module),
        ] {
            if address == Address::ZERO {
                return Err(ConfigError::Invalid(format!("{name} is the zero address")));
            }
        }
        Ok(())
    }

    /// Block to start historical log scans from (genesis if unknown).
    pub fn start_block(&self) -> u64 {
        self.deployment_block.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const SAMPLE: &str = r#"{
        "chainId": 84532,
        "oracleAdapter": "0x1111111111111111111111111111111111111111",
        "marketFactory": "0x2222222222222222222222222222222222222222",
        "resolutionModule": "0x3333333333333333333333333333333333333333",
        "deploymentBlock": 1000
    }"#;

    #[test]
    fn test_parse_deployment() {
        let deployment = Deployment::from_json_str(SAMPLE).unwrap();
        assert_eq!(deployment.chain_id, 84532);
        assert_eq!(
            deployment.market_factory,
            address!("2222222222222222222222222222222222222222")
        );
        assert_eq!(deployment.start_block(), 1000);
    }

    #[test]
    fn test_deployment_block_is_optional() {
        let json = r#"{
            "chainId": 1,
            "oracleAdapter": "0x1111111111111111111111111111111111111111",
            "marketFactory": "0x2222222222222222222222222222222222222222",
            "resolutionModule": "0x3333333333333333333333333333333333333333"
        }"#;
        let deployment = Deployment::from_json_str(json).unwrap();
        assert_eq!(deployment.deployment_block, None);
        assert_eq!(deployment.start_block(), 0);
    }

    #[test]
    fn test_zero_address_rejected() {
        let json = SAMPLE.replace(
            "0x3333333333333333333333333333333333333333",
            "0x0000000000000000000000000000000000000000",
        );
        let err = Deployment::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("resolutionModule"));
    }

    #[test]
    fn test_zero_chain_id_rejected() {
        let json = SAMPLE.replace("84532", "0");
        assert!(Deployment::from_json_str(&json).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Deployment::from_json_file("/nonexistent/deployment.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
