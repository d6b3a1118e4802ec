use alloy::primitives::Address;
use alloy::rpc::types::TransactionReceipt;

use crate::contracts::abi::IMarketFactory;
use crate::contracts::MarketStatus;
use crate::domain::factory::{CreatedMarket, Market};
use crate::error::SdkError;
use crate::events::decode_matching;
use crate::shared::MarketId;

impl TryFrom<(MarketId, IMarketFactory::MarketInfo)> for Market {
    type Error = SdkError;

    fn try_from((id, info): (MarketId, IMarketFactory::MarketInfo)) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            creator: info.creator,
            amm: info.amm,
            collateral_token: info.collateralToken,
            close_time: info.closeTime,
            outcome_count: info.outcomeCount,
            status: MarketStatus::try_from(info.status)?,
            question_hash: info.questionHash,
        })
    }
}

/// The `MarketCreated` event emitted by `factory` in a mined receipt.
impl TryFrom<(Address, &TransactionReceipt)> for CreatedMarket {
    type Error = SdkError;

    fn try_from((factory, receipt): (Address, &TransactionReceipt)) -> Result<Self, Self::Error> {
        let created = decode_matching::<IMarketFactory::MarketCreated>(receipt.inner.logs())?
            .into_iter()
            .find(|log| log.address == factory)
            .ok_or(SdkError::MissingEvent {
                event: "MarketCreated",
                tx_hash: receipt.transaction_hash,
            })?;
        Ok(Self {
            market_id: MarketId(created.event.marketId),
            amm: created.event.amm,
            tx_hash: receipt.transaction_hash,
        })
    }
}
