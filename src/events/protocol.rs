//! Protocol-wide event enum.
//!
//! Decodes any log emitted by the four contracts by matching its first topic, which is
//! useful for indexers that scan every protocol address with one filter.

use alloy::primitives::B256;
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;

use crate::contracts::abi::{IAIOracleAdapter, IMarketFactory, IPoolMarket, IResolutionModule};
use crate::shared::MarketId;

/// Every event emitted by the protocol contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolEvent {
    // Oracle adapter
    OutcomeProposed(IAIOracleAdapter::OutcomeProposed),
    OracleSignerUpdated(IAIOracleAdapter::OracleSignerUpdated),
    ResolutionModuleUpdated(IAIOracleAdapter::ResolutionModuleUpdated),
    // Market factory
    MarketCreated(IMarketFactory::MarketCreated),
    MarketStatusChanged(IMarketFactory::MarketStatusChanged),
    // Pool market
    Mint(IPoolMarket::Mint),
    Burn(IPoolMarket::Burn),
    Collect(IPoolMarket::Collect),
    Swap(IPoolMarket::Swap),
    Redeemed(IPoolMarket::Redeemed),
    // Resolution module
    ResolutionProposed(IResolutionModule::ResolutionProposed),
    ResolutionDisputed(IResolutionModule::ResolutionDisputed),
    ResolutionFinalized(IResolutionModule::ResolutionFinalized),
    BondSlashed(IResolutionModule::BondSlashed),
    BondReturned(IResolutionModule::BondReturned),
}

macro_rules! decode_by_topic {
    ($topic0:expr, $data:expr, $($variant:ident => $event:ty),+ $(,)?) => {
        $(
            if $topic0 == <$event>::SIGNATURE_HASH {
                return <$event>::decode_log_data($data).map(|e| Some(ProtocolEvent::$variant(e)));
            }
        )+
    };
}

impl ProtocolEvent {
    /// Decode a log. Unknown first topics (or anonymous logs) yield `Ok(None)`.
    pub fn decode(log: &Log) -> Result<Option<Self>, alloy::sol_types::Error> {
        let data = log.data();
        let Some(topic0) = data.topics().first().copied() else {
            return Ok(None);
        };
        decode_by_topic!(topic0, data,
            OutcomeProposed => IAIOracleAdapter::OutcomeProposed,
            OracleSignerUpdated => IAIOracleAdapter::OracleSignerUpdated,
            ResolutionModuleUpdated => IAIOracleAdapter::ResolutionModuleUpdated,
            MarketCreated => IMarketFactory::MarketCreated,
            MarketStatusChanged => IMarketFactory::MarketStatusChanged,
            Mint => IPoolMarket::Mint,
            Burn => IPoolMarket::Burn,
            Collect => IPoolMarket::Collect,
            Swap => IPoolMarket::Swap,
            Redeemed => IPoolMarket::Redeemed,
            ResolutionProposed => IResolutionModule::ResolutionProposed,
            ResolutionDisputed => IResolutionModule::ResolutionDisputed,
            ResolutionFinalized => IResolutionModule::ResolutionFinalized,
            BondSlashed => IResolutionModule::BondSlashed,
            BondReturned => IResolutionModule::BondReturned,
        );
        Ok(None)
    }

    /// First topics of every protocol event, for a catch-all filter.
    pub fn signatures() -> Vec<B256> {
        vec![
            IAIOracleAdapter::OutcomeProposed::SIGNATURE_HASH,
            IAIOracleAdapter::OracleSignerUpdated::SIGNATURE_HASH,
            IAIOracleAdapter::ResolutionModuleUpdated::SIGNATURE_HASH,
            IMarketFactory::MarketCreated::SIGNATURE_HASH,
            IMarketFactory::MarketStatusChanged::SIGNATURE_HASH,
            IPoolMarket::Mint::SIGNATURE_HASH,
            IPoolMarket::Burn::SIGNATURE_HASH,
            IPoolMarket::Collect::SIGNATURE_HASH,
            IPoolMarket::Swap::SIGNATURE_HASH,
            IPoolMarket::Redeemed::SIGNATURE_HASH,
            IResolutionModule::ResolutionProposed::SIGNATURE_HASH,
            IResolutionModule::ResolutionDisputed::SIGNATURE_HASH,
            IResolutionModule::ResolutionFinalized::SIGNATURE_HASH,
            IResolutionModule::BondSlashed::SIGNATURE_HASH,
            IResolutionModule::BondReturned::SIGNATURE_HASH,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProtocolEvent::OutcomeProposed(_) => "OutcomeProposed",
            ProtocolEvent::OracleSignerUpdated(_) => "OracleSignerUpdated",
            ProtocolEvent::ResolutionModuleUpdated(_) => "ResolutionModuleUpdated",
            ProtocolEvent::MarketCreated(_) => "MarketCreated",
            ProtocolEvent::MarketStatusChanged(_) => "MarketStatusChanged",
            ProtocolEvent::Mint(_) => "Mint",
            ProtocolEvent::Burn(_) => "Burn",
            ProtocolEvent::Collect(_) => "Collect",
            ProtocolEvent::Swap(_) => "Swap",
            ProtocolEvent::Redeemed(_) => "Redeemed",
            ProtocolEvent::ResolutionProposed(_) => "ResolutionProposed",
            ProtocolEvent::ResolutionDisputed(_) => "ResolutionDisputed",
            ProtocolEvent::ResolutionFinalized(_) => "ResolutionFinalized",
            ProtocolEvent::BondSlashed(_) => "BondSlashed",
            ProtocolEvent::BondReturned(_) => "BondReturned",
        }
    }

    /// Market the event refers to, when it carries one.
    ///
    /// Pool events identify their market by emitting address instead.
    pub fn market_id(&self) -> Option<MarketId> {
        let id = match self {
            ProtocolEvent::OutcomeProposed(e) => e.marketId,
            ProtocolEvent::MarketCreated(e) => e.marketId,
            ProtocolEvent::MarketStatusChanged(e) => e.marketId,
            ProtocolEvent::ResolutionProposed(e) => e.marketId,
            ProtocolEvent::ResolutionDisputed(e) => e.marketId,
            ProtocolEvent::ResolutionFinalized(e) => e.marketId,
            ProtocolEvent::BondSlashed(e) => e.marketId,
            ProtocolEvent::BondReturned(e) => e.marketId,
            _ => return None,
        };
        Some(MarketId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, LogData, U256};

    fn log_from(data: LogData) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0x01),
                data,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_market_created() {
        let event = IMarketFactory::MarketCreated {
            marketId: U256::from(4u8),
            creator: Address::repeat_byte(0x0c),
            amm: Address::repeat_byte(0x0a),
            collateralToken: Address::repeat_byte(0x0d),
            closeTime: 1_800_000_000,
            questionHash: B256::repeat_byte(0x99),
        };
        let log = log_from(event.encode_log_data());
        let decoded = ProtocolEvent::decode(&log).unwrap().unwrap();
        assert_eq!(decoded.name(), "MarketCreated");
        assert_eq!(decoded.market_id(), Some(MarketId::new(4)));
        assert_eq!(decoded, ProtocolEvent::MarketCreated(event));
    }

    #[test]
    fn test_decode_unknown_topic() {
        let data = LogData::new_unchecked(vec![B256::repeat_byte(0x77)], Default::default());
        assert_eq!(ProtocolEvent::decode(&log_from(data)).unwrap(), None);

        let anonymous = LogData::new_unchecked(vec![], Default::default());
        assert_eq!(ProtocolEvent::decode(&log_from(anonymous)).unwrap(), None);
    }

    #[test]
    fn test_decode_truncated_data_is_error() {
        let data = LogData::new_unchecked(
            vec![IResolutionModule::ResolutionFinalized::SIGNATURE_HASH, B256::ZERO],
            Default::default(),
        );
        assert!(ProtocolEvent::decode(&log_from(data)).is_err());
    }

    #[test]
    fn test_pool_events_have_no_market_id() {
        let event = IPoolMarket::Redeemed {
            account: Address::repeat_byte(0x01),
            outcomeId: U256::from(1u8),
            amount: U256::from(10u8),
            payout: U256::from(10u8),
        };
        let decoded = ProtocolEvent::decode(&log_from(event.encode_log_data()))
            .unwrap()
            .unwrap();
        assert_eq!(decoded.market_id(), None);
    }

    #[test]
    fn test_signatures_are_unique() {
        let mut sigs = ProtocolEvent::signatures();
        assert_eq!(sigs.len(), 15);
        sigs.sort();
        sigs.dedup();
        assert_eq!(sigs.len(), 15);
    }
}
