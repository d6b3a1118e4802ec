//! Market registry: app-owned, rebuilt from factory events.

use std::collections::{BTreeMap, HashMap};

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::contracts::abi::IMarketFactory;
use crate::contracts::MarketStatus;
use crate::domain::factory::Market;
use crate::error::SdkError;
use crate::events::{DecodedLog, ProtocolEvent};
use crate::shared::MarketId;

/// A market as known from factory events.
///
/// `MarketCreated` does not carry the outcome count, so it stays `None` until the entry
/// is seeded from a `getMarket` read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub id: MarketId,
    pub creator: Address,
    pub amm: Address,
    pub collateral_token: Address,
    pub close_time: u64,
    pub question_hash: B256,
    pub status: MarketStatus,
    pub outcome_count: Option<u8>,
    /// Block of the last applied log, when known
    pub last_block: Option<u64>,
}

impl From<Market> for RegistryEntry {
    fn from(m: Market) -> Self {
        Self {
            id: m.id,
            creator: m.creator,
            amm: m.amm,
            collateral_token: m.collateral_token,
            close_time: m.close_time,
            question_hash: m.question_hash,
            status: m.status,
            outcome_count: Some(m.outcome_count),
            last_block: None,
        }
    }
}

/// Tracks every market created by one factory, keyed by id.
///
/// The app owns instances of this type and feeds it logs from `market_created_logs`,
/// `market_status_changed_logs` or the matching watchers.
#[derive(Debug, Clone, Default)]
pub struct MarketRegistry {
    markets: BTreeMap<MarketId, RegistryEntry>,
    by_amm: HashMap<Address, MarketId>,
}

impl MarketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry from a `getMarket` read.
    pub fn insert(&mut self, market: Market) {
        let entry = RegistryEntry::from(market);
        self.by_amm.insert(entry.amm, entry.id);
        self.markets.insert(entry.id, entry);
    }

    /// Apply a `MarketCreated` event. An existing entry keeps its known outcome count.
    pub fn apply_created(&mut self, event: &IMarketFactory::MarketCreated, block: Option<u64>) {
        let id = MarketId(event.marketId);
        let outcome_count = self.markets.get(&id).and_then(|e| e.outcome_count);
        self.by_amm.insert(event.amm, id);
        self.markets.insert(
            id,
            RegistryEntry {
                id,
                creator: event.creator,
                amm: event.amm,
                collateral_token: event.collateralToken,
                close_time: event.closeTime,
                question_hash: event.questionHash,
                status: MarketStatus::Open,
                outcome_count,
                last_block: block,
            },
        );
    }

    /// Apply a `MarketStatusChanged` event.
    ///
    /// Returns `Ok(false)` when the market is not tracked. Unknown status bytes are errors.
    pub fn apply_status_changed(
        &mut self,
        event: &IMarketFactory::MarketStatusChanged,
        block: Option<u64>,
    ) -> Result<bool, SdkError> {
        let status = MarketStatus::try_from(event.newStatus)?;
        let Some(entry) = self.markets.get_mut(&MarketId(event.marketId)) else {
            return Ok(false);
        };
        entry.status = status;
        if block.is_some() {
            entry.last_block = block;
        }
        Ok(true)
    }

    /// Apply a decoded `MarketCreated` log. Logs removed by a reorg drop the entry.
    pub fn apply_created_log(&mut self, log: &DecodedLog<IMarketFactory::MarketCreated>) {
        if log.removed {
            self.remove(MarketId(log.event.marketId));
        } else {
            self.apply_created(&log.event, log.block_number);
        }
    }

    /// Apply a decoded `MarketStatusChanged` log. Logs removed by a reorg restore the
    /// previous status.
    pub fn apply_status_log(
        &mut self,
        log: &DecodedLog<IMarketFactory::MarketStatusChanged>,
    ) -> Result<bool, SdkError> {
        if log.removed {
            let reverted = IMarketFactory::MarketStatusChanged {
                marketId: log.event.marketId,
                previousStatus: log.event.newStatus,
                newStatus: log.event.previousStatus,
            };
            return self.apply_status_changed(&reverted, None);
        }
        self.apply_status_changed(&log.event, log.block_number)
    }

    /// Apply any protocol event. Events other than the factory's are ignored.
    pub fn apply(&mut self, event: &ProtocolEvent) -> Result<bool, SdkError> {
        match event {
            ProtocolEvent::MarketCreated(e) => {
                self.apply_created(e, None);
                Ok(true)
            }
            ProtocolEvent::MarketStatusChanged(e) => self.apply_status_changed(e, None),
            _ => Ok(false),
        }
    }

    pub fn remove(&mut self, id: MarketId) -> Option<RegistryEntry> {
        let entry = self.markets.remove(&id)?;
        self.by_amm.remove(&entry.amm);
        Some(entry)
    }

    pub fn get(&self, id: MarketId) -> Option<&RegistryEntry> {
        self.markets.get(&id)
    }

    /// Look up a market by its pool address.
    pub fn by_amm(&self, amm: Address) -> Option<&RegistryEntry> {
        self.by_amm.get(&amm).and_then(|id| self.markets.get(id))
    }

    /// Entries with status `Open`, in id order.
    pub fn open_markets(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.markets
            .values()
            .filter(|e| e.status == MarketStatus::Open)
    }

    /// All entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.markets.values()
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    pub fn clear(&mut self) {
        self.markets.clear();
        self.by_amm.clear();
    }
}
