//! Indexed-argument topic encoding and filter helpers.
//!
//! Indexed value types are stored as their 32-byte ABI encoding: addresses left-padded,
//! unsigned integers big-endian, signed integers sign-extended.

use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Filter;

use crate::error::{SdkError, SdkResult};
use crate::shared::{MarketId, MAX_TICK, MIN_TICK};

pub fn address_topic(address: Address) -> B256 {
    address.into_word()
}

pub fn u256_topic(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

pub fn market_topic(market_id: MarketId) -> B256 {
    market_id.to_topic()
}

/// Sign-extended `int24` topic.
pub fn int24_topic(tick: i32) -> SdkResult<B256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(SdkError::OutOfRange {
            field: "tick",
            value: tick.to_string(),
        });
    }
    let fill = if tick < 0 { 0xff } else { 0x00 };
    let mut word = [fill; 32];
    word[28..].copy_from_slice(&tick.to_be_bytes());
    Ok(B256::from(word))
}

/// Restrict indexed topic `position` (1..=3) to any of `values`.
///
/// An empty `values` leaves the position as a wildcard.
pub fn with_topic(filter: Filter, position: usize, values: Vec<B256>) -> Filter {
    if values.is_empty() {
        return filter;
    }
    match position {
        1 => filter.topic1(values),
        2 => filter.topic2(values),
        3 => filter.topic3(values),
        _ => filter,
    }
}

pub fn address_topics(addresses: &[Address]) -> Vec<B256> {
    addresses.iter().copied().map(address_topic).collect()
}

pub fn market_topics(market_ids: &[MarketId]) -> Vec<B256> {
    market_ids.iter().copied().map(market_topic).collect()
}

pub fn int24_topics(ticks: &[i32]) -> SdkResult<Vec<B256>> {
    ticks.iter().copied().map(int24_topic).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use alloy::rpc::types::FilterSet;

    #[test]
    fn test_address_topic_left_pads() {
        let a = address!("00000000000000000000000000000000000000ff");
        let topic = address_topic(a);
        assert!(topic[..31].iter().all(|b| *b == 0));
        assert_eq!(topic[31], 0xff);
    }

    #[test]
    fn test_u256_topic() {
        let topic = u256_topic(U256::from(0x0102u64));
        assert_eq!(topic[30], 0x01);
        assert_eq!(topic[31], 0x02);
        assert_eq!(market_topic(MarketId::new(0x0102)), topic);
    }

    #[test]
    fn test_int24_topic_sign_extension() {
        let neg = int24_topic(-1).unwrap();
        assert!(neg.iter().all(|b| *b == 0xff));

        let neg60 = int24_topic(-60).unwrap();
        assert_eq!(neg60[31], 0xc4);
        assert!(neg60[..31].iter().all(|b| *b == 0xff));

        let pos = int24_topic(60).unwrap();
        assert_eq!(pos[31], 60);
        assert!(pos[..31].iter().all(|b| *b == 0));

        assert!(int24_topic(MAX_TICK + 1).is_err());
    }

    #[test]
    fn test_with_topic_empty_is_wildcard() {
        let filter = with_topic(Filter::new(), 1, vec![]);
        assert!(filter.topics[1].is_empty());

        let values = vec![B256::repeat_byte(1), B256::repeat_byte(2)];
        let filter = with_topic(Filter::new(), 2, values.clone());
        assert_eq!(filter.topics[2], FilterSet::from(values));
        assert!(filter.topics[1].is_empty());
    }
}
