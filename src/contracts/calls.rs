//! Unsigned transaction builders.
//!
//! Each `build_*` function ABI-encodes one mutating call and returns a
//! `TransactionRequest` with only `to` and `input` set. Nonce, gas and fees are left for the
//! wallet (or an external signer) to fill.

use alloy::primitives::{Address, Bytes, TxKind, B256};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol_types::SolCall;

use crate::contracts::abi::{IAIOracleAdapter, IMarketFactory, IPoolMarket, IResolutionModule};
use crate::contracts::proposal::SignedProposal;
use crate::contracts::types::{
    to_int24, to_uint160, to_uint24, BurnParams, CollectParams, CreateMarketParams, MintParams,
    SwapParams,
};
use crate::error::SdkResult;
use crate::shared::{MarketId, OutcomeId};

/// Wrap encoded calldata for `to`.
pub fn call_request<C: SolCall>(to: Address, call: &C) -> TransactionRequest {
    TransactionRequest {
        to: Some(TxKind::Call(to)),
        input: TransactionInput::new(Bytes::from(call.abi_encode())),
        ..Default::default()
    }
}

// ============================================================================
// Oracle adapter
// ============================================================================

pub fn build_propose_outcome(
    adapter: Address,
    proposal: &SignedProposal,
) -> SdkResult<TransactionRequest> {
    let call = IAIOracleAdapter::proposeOutcomeCall {
        proposal: proposal.to_abi(),
        signature: proposal.signature_bytes()?,
    };
    Ok(call_request(adapter, &call))
}

pub fn build_set_oracle_signer(adapter: Address, new_signer: Address) -> TransactionRequest {
    call_request(adapter, &IAIOracleAdapter::setOracleSignerCall { newSigner: new_signer })
}

pub fn build_set_resolution_module(adapter: Address, new_module: Address) -> TransactionRequest {
    call_request(
        adapter,
        &IAIOracleAdapter::setResolutionModuleCall { newModule: new_module },
    )
}

// ============================================================================
// Market factory
// ============================================================================

/// Narrow create-market parameters to their ABI widths.
pub fn encode_create_market_params(
    params: &CreateMarketParams,
) -> SdkResult<IMarketFactory::CreateMarketParams> {
    Ok(IMarketFactory::CreateMarketParams {
        collateralToken: params.collateral_token,
        outcomeCount: params.outcome_count,
        closeTime: params.close_time,
        questionHash: params.question_hash,
        fee: to_uint24("fee", params.fee)?,
        tickSpacing: to_int24("tick_spacing", params.tick_spacing)?,
        initialSqrtPriceX96: to_uint160("initial_sqrt_price_x96", params.initial_sqrt_price_x96)?,
    })
}

pub fn build_create_market(
    factory: Address,
    params: &CreateMarketParams,
) -> SdkResult<TransactionRequest> {
    let call = IMarketFactory::createMarketCall {
        params: encode_create_market_params(params)?,
    };
    Ok(call_request(factory, &call))
}

pub fn build_close_market(factory: Address, market_id: MarketId) -> TransactionRequest {
    call_request(
        factory,
        &IMarketFactory::closeMarketCall {
            marketId: market_id.as_u256(),
        },
    )
}

pub fn build_cancel_market(factory: Address, market_id: MarketId) -> TransactionRequest {
    call_request(
        factory,
        &IMarketFactory::cancelMarketCall {
            marketId: market_id.as_u256(),
        },
    )
}

// ============================================================================
// Pool market
// ============================================================================

pub fn build_mint(pool: Address, params: &MintParams) -> SdkResult<TransactionRequest> {
    let call = IPoolMarket::mintCall {
        recipient: params.recipient,
        tickLower: to_int24("tick_lower", params.tick_lower)?,
        tickUpper: to_int24("tick_upper", params.tick_upper)?,
        amount: params.amount,
    };
    Ok(call_request(pool, &call))
}

pub fn build_burn(pool: Address, params: &BurnParams) -> SdkResult<TransactionRequest> {
    let call = IPoolMarket::burnCall {
        tickLower: to_int24("tick_lower", params.tick_lower)?,
        tickUpper: to_int24("tick_upper", params.tick_upper)?,
        amount: params.amount,
    };
    Ok(call_request(pool, &call))
}

pub fn build_collect(pool: Address, params: &CollectParams) -> SdkResult<TransactionRequest> {
    let call = IPoolMarket::collectCall {
        recipient: params.recipient,
        tickLower: to_int24("tick_lower", params.tick_lower)?,
        tickUpper: to_int24("tick_upper", params.tick_upper)?,
        amount0Requested: params.amount0_requested,
        amount1Requested: params.amount1_requested,
    };
    Ok(call_request(pool, &call))
}

pub fn build_swap(pool: Address, params: &SwapParams) -> SdkResult<TransactionRequest> {
    let call = IPoolMarket::swapCall {
        recipient: params.recipient,
        zeroForOne: params.zero_for_one,
        amountSpecified: params.amount_specified,
        sqrtPriceLimitX96: to_uint160("sqrt_price_limit_x96", params.sqrt_price_limit_x96)?,
    };
    Ok(call_request(pool, &call))
}

pub fn build_redeem(pool: Address, recipient: Address) -> TransactionRequest {
    call_request(pool, &IPoolMarket::redeemCall { recipient })
}

// ============================================================================
// Resolution module
// ============================================================================

pub fn build_propose_resolution(
    module: Address,
    market_id: MarketId,
    outcome_id: OutcomeId,
    evidence_hash: B256,
) -> TransactionRequest {
    call_request(
        module,
        &IResolutionModule::proposeResolutionCall {
            marketId: market_id.as_u256(),
            outcomeId: outcome_id.as_u256(),
            evidenceHash: evidence_hash,
        },
    )
}

pub fn build_dispute(module: Address, market_id: MarketId, evidence_hash: B256) -> TransactionRequest {
    call_request(
        module,
        &IResolutionModule::disputeCall {
            marketId: market_id.as_u256(),
            evidenceHash: evidence_hash,
        },
    )
}

pub fn build_finalize(module: Address, market_id: MarketId) -> TransactionRequest {
    call_request(
        module,
        &IResolutionModule::finalizeCall {
            marketId: market_id.as_u256(),
        },
    )
}

pub fn build_adjudicate(
    module: Address,
    market_id: MarketId,
    outcome_id: OutcomeId,
) -> TransactionRequest {
    call_request(
        module,
        &IResolutionModule::adjudicateCall {
            marketId: market_id.as_u256(),
            outcomeId: outcome_id.as_u256(),
        },
    )
}
