//! Solidity interfaces of the four protocol contracts.
//!
//! Selectors, event topics and struct tuple encodings are derived from these
//! declarations by `sol!`; they are the wire contract with the deployed bytecode.

#![allow(missing_docs, clippy::too_many_arguments)]

use alloy::sol;

sol! {
    /// AI-outcome oracle adapter: accepts EIP-712 signed outcome proposals and forwards
    /// them to the resolution module.
    #[derive(Debug, PartialEq, Eq)]
    interface IAIOracleAdapter {
        struct ProposedOutcome {
            uint256 marketId;
            uint256 outcomeId;
            uint64 closeTime;
            bytes32 evidenceHash;
            uint64 validityWindow;
            uint64 deadline;
        }

        event OutcomeProposed(
            bytes32 indexed proposalId,
            uint256 indexed marketId,
            uint256 outcomeId,
            bytes32 evidenceHash,
            address indexed submitter
        );
        event OracleSignerUpdated(address indexed previousSigner, address indexed newSigner);
        event ResolutionModuleUpdated(address indexed previousModule, address indexed newModule);

        function proposeOutcome(ProposedOutcome calldata proposal, bytes calldata signature)
            external
            returns (bytes32 proposalId);
        function hashProposal(ProposedOutcome calldata proposal) external view returns (bytes32);
        function isProposalUsed(bytes32 proposalId) external view returns (bool);
        function oracleSigner() external view returns (address);
        function resolutionModule() external view returns (address);
        function DOMAIN_SEPARATOR() external view returns (bytes32);
        function owner() external view returns (address);
        function setOracleSigner(address newSigner) external;
        function setResolutionModule(address newModule) external;
    }
}

sol! {
    /// Deploys one pool market per question and tracks market lifecycle status.
    #[derive(Debug, PartialEq, Eq)]
    interface IMarketFactory {
        struct MarketInfo {
            address creator;
            address amm;
            address collateralToken;
            uint64 closeTime;
            uint8 outcomeCount;
            uint8 status;
            bytes32 questionHash;
        }

        struct CreateMarketParams {
            address collateralToken;
            uint8 outcomeCount;
            uint64 closeTime;
            bytes32 questionHash;
            uint24 fee;
            int24 tickSpacing;
            uint160 initialSqrtPriceX96;
        }

        event MarketCreated(
            uint256 indexed marketId,
            address indexed creator,
            address amm,
            address collateralToken,
            uint64 closeTime,
            bytes32 questionHash
        );
        event MarketStatusChanged(uint256 indexed marketId, uint8 previousStatus, uint8 newStatus);

        function createMarket(CreateMarketParams calldata params)
            external
            returns (uint256 marketId, address amm);
        function getMarket(uint256 marketId) external view returns (MarketInfo memory);
        function marketCount() external view returns (uint256);
        function marketIdByAmm(address amm) external view returns (uint256);
        function resolutionModule() external view returns (address);
        function owner() external view returns (address);
        function closeMarket(uint256 marketId) external;
        function cancelMarket(uint256 marketId) external;
    }
}

sol! {
    /// Concentrated-liquidity AMM for a single market's outcome token.
    #[derive(Debug, PartialEq, Eq)]
    interface IPoolMarket {
        event Mint(
            address sender,
            address indexed owner,
            int24 indexed tickLower,
            int24 indexed tickUpper,
            uint128 amount,
            uint256 amount0,
            uint256 amount1
        );
        event Burn(
            address indexed owner,
            int24 indexed tickLower,
            int24 indexed tickUpper,
            uint128 amount,
            uint256 amount0,
            uint256 amount1
        );
        event Collect(
            address indexed owner,
            address recipient,
            int24 indexed tickLower,
            int24 indexed tickUpper,
            uint128 amount0,
            uint128 amount1
        );
        event Swap(
            address indexed sender,
            address indexed recipient,
            int256 amount0,
            int256 amount1,
            uint160 sqrtPriceX96,
            uint128 liquidity,
            int24 tick
        );
        event Redeemed(address indexed account, uint256 outcomeId, uint256 amount, uint256 payout);

        function marketId() external view returns (uint256);
        function factory() external view returns (address);
        function collateralToken() external view returns (address);
        function token0() external view returns (address);
        function token1() external view returns (address);
        function fee() external view returns (uint24);
        function tickSpacing() external view returns (int24);
        function slot0() external view returns (uint160 sqrtPriceX96, int24 tick, bool unlocked);
        function liquidity() external view returns (uint128);
        function ticks(int24 tick)
            external
            view
            returns (
                uint128 liquidityGross,
                int128 liquidityNet,
                uint256 feeGrowthOutside0X128,
                uint256 feeGrowthOutside1X128,
                bool initialized
            );
        function positions(bytes32 key)
            external
            view
            returns (
                uint128 liquidity,
                uint256 feeGrowthInside0LastX128,
                uint256 feeGrowthInside1LastX128,
                uint128 tokensOwed0,
                uint128 tokensOwed1
            );

        function mint(address recipient, int24 tickLower, int24 tickUpper, uint128 amount)
            external
            returns (uint256 amount0, uint256 amount1);
        function burn(int24 tickLower, int24 tickUpper, uint128 amount)
            external
            returns (uint256 amount0, uint256 amount1);
        function collect(
            address recipient,
            int24 tickLower,
            int24 tickUpper,
            uint128 amount0Requested,
            uint128 amount1Requested
        ) external returns (uint128 amount0, uint128 amount1);
        function swap(
            address recipient,
            bool zeroForOne,
            int256 amountSpecified,
            uint160 sqrtPriceLimitX96
        ) external returns (int256 amount0, int256 amount1);
        function redeem(address recipient) external returns (uint256 payout);
    }
}

sol! {
    /// Bonded propose / dispute / finalize state machine for market outcomes.
    #[derive(Debug, PartialEq, Eq)]
    interface IResolutionModule {
        struct Resolution {
            uint256 proposedOutcome;
            address proposer;
            uint256 proposerBond;
            address disputer;
            uint256 disputerBond;
            uint64 proposedAt;
            uint64 disputeDeadline;
            bytes32 evidenceHash;
            uint8 state;
            uint256 finalOutcome;
        }

        event ResolutionProposed(
            uint256 indexed marketId,
            address indexed proposer,
            uint256 outcomeId,
            uint256 bond,
            bytes32 evidenceHash,
            uint64 disputeDeadline
        );
        event ResolutionDisputed(
            uint256 indexed marketId,
            address indexed disputer,
            uint256 bond,
            bytes32 evidenceHash
        );
        event ResolutionFinalized(uint256 indexed marketId, uint256 outcomeId, bool disputed);
        event BondSlashed(uint256 indexed marketId, address indexed account, uint256 amount);
        event BondReturned(uint256 indexed marketId, address indexed account, uint256 amount);

        function proposeResolution(uint256 marketId, uint256 outcomeId, bytes32 evidenceHash) external;
        function dispute(uint256 marketId, bytes32 evidenceHash) external;
        function finalize(uint256 marketId) external;
        function adjudicate(uint256 marketId, uint256 outcomeId) external;
        function getResolution(uint256 marketId) external view returns (Resolution memory);
        function disputeWindow() external view returns (uint64);
        function proposerBond() external view returns (uint256);
        function disputerBond() external view returns (uint256);
        function bondToken() external view returns (address);
        function arbiter() external view returns (address);
        function oracleAdapter() external view returns (address);
    }
}
