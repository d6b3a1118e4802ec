//! Keccak256 helpers for values the contracts hash on chain.

use alloy::primitives::{Address, B256};
use sha3::{Digest, Keccak256};

use crate::error::SdkError;
use crate::shared::{MAX_TICK, MIN_TICK};

/// Keccak256 of an evidence document, as committed in proposals and disputes.
pub fn evidence_hash(evidence: impl AsRef<[u8]>) -> B256 {
    B256::from(<[u8; 32]>::from(Keccak256::digest(evidence.as_ref())))
}

/// Keccak256 of a market question's UTF-8 text.
pub fn question_hash(question: &str) -> B256 {
    evidence_hash(question.as_bytes())
}

/// Pool position key: `keccak256(abi.encodePacked(owner, tickLower, tickUpper))`.
///
/// Ticks are packed as 3-byte big-endian two's complement (`int24`).
pub fn position_key(owner: Address, tick_lower: i32, tick_upper: i32) -> Result<B256, SdkError> {
    let mut packed = [0u8; 26];
    packed[0..20].copy_from_slice(owner.as_slice());
    packed[20..23].copy_from_slice(&pack_int24("tick_lower", tick_lower)?);
    packed[23..26].copy_from_slice(&pack_int24("tick_upper", tick_upper)?);
    Ok(B256::from(<[u8; 32]>::from(Keccak256::digest(packed))))
}

fn pack_int24(field: &'static str, tick: i32) -> Result<[u8; 3], SdkError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(SdkError::OutOfRange {
            field,
            value: tick.to_string(),
        });
    }
    let bytes = tick.to_be_bytes();
    Ok([bytes[1], bytes[2], bytes[3]])
}
