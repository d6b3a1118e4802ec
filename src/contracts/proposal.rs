//! EIP-712 signed outcome proposals for the oracle adapter.
//!
//! The adapter accepts a `ProposedOutcome` together with a 65-byte `r || s || v` signature
//! from its configured oracle signer. The proposal id is the EIP-712 signing digest under
//! the adapter's domain (`AIOracleAdapter`, version `1`, chain id, adapter address), so it
//! can be computed locally and matched against `OutcomeProposed` logs.
//!
//! Timing checks here are advisory. The adapter remains the authority on whether a
//! proposal is accepted.

use std::borrow::Cow;

use alloy::primitives::{Address, Bytes, Signature, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use alloy::sol_types::{Eip712Domain, SolStruct};
use serde::{Deserialize, Serialize};

use crate::contracts::abi::IAIOracleAdapter;
use crate::contracts::constants::{EIP712_DOMAIN_NAME, EIP712_DOMAIN_VERSION, SIGNATURE_LENGTH};
use crate::error::{SdkError, SdkResult};
use crate::shared::{MarketId, OutcomeId, ProposalId};

/// EIP-712 domain of an oracle adapter deployment.
pub fn proposal_domain(chain_id: u64, adapter: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(EIP712_DOMAIN_NAME)),
        Some(Cow::Borrowed(EIP712_DOMAIN_VERSION)),
        Some(U256::from(chain_id)),
        Some(adapter),
        None,
    )
}

/// Unsigned proposal fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalParams {
    pub market_id: MarketId,
    pub outcome_id: OutcomeId,
    /// Market close time the proposal refers to
    pub close_time: u64,
    /// Keccak256 of the evidence document backing the outcome
    pub evidence_hash: B256,
    /// Seconds after `close_time` during which the proposal may be submitted
    pub validity_window: u64,
    /// Unix time after which the signature is no longer accepted
    pub deadline: u64,
}

/// An outcome proposal plus its oracle signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedProposal {
    pub market_id: MarketId,
    pub outcome_id: OutcomeId,
    pub close_time: u64,
    pub evidence_hash: B256,
    pub validity_window: u64,
    pub deadline: u64,
    /// `None` until signed
    pub signature: Option<Signature>,
}

impl SignedProposal {
    /// Create an unsigned proposal.
    pub fn new(params: ProposalParams) -> Self {
        Self {
            market_id: params.market_id,
            outcome_id: params.outcome_id,
            close_time: params.close_time,
            evidence_hash: params.evidence_hash,
            validity_window: params.validity_window,
            deadline: params.deadline,
            signature: None,
        }
    }

    /// Create and sign a proposal in one step.
    pub fn new_signed(
        params: ProposalParams,
        signer: &PrivateKeySigner,
        chain_id: u64,
        adapter: Address,
    ) -> SdkResult<Self> {
        let mut proposal = Self::new(params);
        proposal.sign(signer, chain_id, adapter)?;
        Ok(proposal)
    }

    /// Attach an externally produced signature.
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn params(&self) -> ProposalParams {
        ProposalParams {
            market_id: self.market_id,
            outcome_id: self.outcome_id,
            close_time: self.close_time,
            evidence_hash: self.evidence_hash,
            validity_window: self.validity_window,
            deadline: self.deadline,
        }
    }

    /// The ABI struct passed to `proposeOutcome` / `hashProposal`.
    pub fn to_abi(&self) -> IAIOracleAdapter::ProposedOutcome {
        IAIOracleAdapter::ProposedOutcome {
            marketId: self.market_id.as_u256(),
            outcomeId: self.outcome_id.as_u256(),
            closeTime: self.close_time,
            evidenceHash: self.evidence_hash,
            validityWindow: self.validity_window,
            deadline: self.deadline,
        }
    }

    /// EIP-712 struct hash (`hashStruct(ProposedOutcome)`).
    pub fn struct_hash(&self) -> B256 {
        self.to_abi().eip712_hash_struct()
    }

    /// EIP-712 signing digest. This is the value the adapter returns from `hashProposal`.
    pub fn signing_hash(&self, chain_id: u64, adapter: Address) -> B256 {
        self.to_abi()
            .eip712_signing_hash(&proposal_domain(chain_id, adapter))
    }

    /// Proposal id under a given adapter deployment.
    pub fn proposal_id(&self, chain_id: u64, adapter: Address) -> ProposalId {
        ProposalId(self.signing_hash(chain_id, adapter))
    }

    /// Sign with a local key, returning the proposal id.
    pub fn sign(
        &mut self,
        signer: &PrivateKeySigner,
        chain_id: u64,
        adapter: Address,
    ) -> SdkResult<ProposalId> {
        let hash = self.signing_hash(chain_id, adapter);
        let signature = signer.sign_hash_sync(&hash)?;
        self.signature = Some(signature);
        Ok(ProposalId(hash))
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Recover the address that produced the signature.
    pub fn recover_signer(&self, chain_id: u64, adapter: Address) -> SdkResult<Address> {
        let signature = self.signature.ok_or(SdkError::MissingField("signature"))?;
        let hash = self.signing_hash(chain_id, adapter);
        Ok(signature.recover_address_from_prehash(&hash)?)
    }

    /// Check the signature against the adapter's expected oracle signer.
    pub fn verify(&self, chain_id: u64, adapter: Address, expected: Address) -> SdkResult<bool> {
        Ok(self.recover_signer(chain_id, adapter)? == expected)
    }

    /// 65-byte `r || s || v` signature, `v` in `{27, 28}`.
    pub fn signature_bytes(&self) -> SdkResult<Bytes> {
        let signature = self.signature.ok_or(SdkError::MissingField("signature"))?;
        Ok(Bytes::copy_from_slice(&signature.as_bytes()))
    }

    /// Signature as a `0x`-prefixed hex string.
    pub fn signature_hex(&self) -> SdkResult<String> {
        Ok(format!("0x{}", hex::encode(self.signature_bytes()?)))
    }

    /// Parse a hex `r || s || v` signature and attach it.
    pub fn with_signature_hex(self, signature_hex: &str) -> SdkResult<Self> {
        Ok(self.with_signature(parse_signature_hex(signature_hex)?))
    }

    /// `true` once `now` is past the signature deadline.
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.deadline
    }

    /// `true` when `now` falls in `[close_time, close_time + validity_window]` and the
    /// deadline has not passed.
    pub fn is_within_validity_window(&self, now: u64) -> bool {
        let window_end = self.close_time.saturating_add(self.validity_window);
        now >= self.close_time && now <= window_end && !self.is_expired(now)
    }
}

/// Parse a 65-byte hex signature (with or without `0x`).
pub fn parse_signature_hex(signature_hex: &str) -> SdkResult<Signature> {
    let raw = signature_hex
        .strip_prefix("0x")
        .unwrap_or(signature_hex);
    let bytes = hex::decode(raw)
        .map_err(|e| SdkError::Validation(format!("Invalid signature hex: {}", e)))?;
    if bytes.len() != SIGNATURE_LENGTH {
        return Err(SdkError::Validation(format!(
            "Signature must be {} bytes, got {}",
            SIGNATURE_LENGTH,
            bytes.len()
        )));
    }
    Ok(Signature::try_from(bytes.as_slice())?)
}
