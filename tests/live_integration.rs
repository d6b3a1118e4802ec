//! Live integration tests against a node with the protocol deployed.
//!
//! Requires in `.env` (or the environment):
//! 1. `RPC_URL`: node endpoint (`ws://` for the watcher test)
//! 2. `DEPLOYMENT_PATH`: deployment JSON (see `Deployment`)
//! 3. `PRIVATE_KEY` (optional): funded account for the transaction tests
//! 4. `ORACLE_SIGNER_KEY` (optional): key registered as the adapter's oracle signer
//!
//! Run: cargo test --test live_integration -- --nocapture --ignored

use std::env;
use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use oracle_markets::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn env_var(name: &str) -> Option<String> {
    dotenvy::dotenv().ok();
    env::var(name).ok().filter(|v| !v.is_empty())
}

async fn connect(with_signer: bool) -> Option<OracleMarketsClient> {
    let rpc_url = env_var("RPC_URL")?;
    let deployment = Deployment::from_json_file(env_var("DEPLOYMENT_PATH")?).ok()?;
    let mut builder = OracleMarketsClient::builder()
        .rpc_url(&rpc_url)
        .deployment(deployment)
        .read_retry(RetryPolicy::Idempotent);
    if with_signer {
        builder = builder.private_key(&env_var("PRIVATE_KEY")?).ok()?;
    }
    Some(builder.build().await.unwrap())
}

macro_rules! client_or_skip {
    ($with_signer:expr) => {
        match connect($with_signer).await {
            Some(client) => client,
            None => {
                println!("Skipping: RPC_URL / DEPLOYMENT_PATH / PRIVATE_KEY not configured");
                return;
            }
        }
    };
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_oracle_config_and_domain() {
    let client = client_or_skip!(false);
    let config = client.oracle().config().await.unwrap();
    println!("Oracle config: {:?}", config);
    assert_eq!(config.resolution_module, client.deployment().resolution_module);
    assert!(client.oracle().verify_domain().await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_registry_matches_factory_reads() {
    let client = client_or_skip!(false);
    let start = client.deployment().start_block();
    let registry = client
        .factory()
        .load_registry(LogQuery::since(start))
        .await
        .unwrap();
    println!("Markets in registry: {}", registry.len());

    for entry in registry.iter().take(5) {
        let market = client.factory().get_market(entry.id).await.unwrap();
        assert_eq!(market.amm, entry.amm);
        assert_eq!(market.status, entry.status);

        let pool = client.pool(market.amm);
        let snapshot = pool.snapshot().await.unwrap();
        println!("Market {}: {:?}", market.id, snapshot);
        assert_eq!(pool.market_id().await.unwrap(), market.id);
    }
}

#[tokio::test]
#[ignore]
async fn test_resolution_params() {
    let client = client_or_skip!(false);
    let params = client.resolution().params().await.unwrap();
    println!("Resolution params: {:?}", params);
    assert_eq!(params.oracle_adapter, client.deployment().oracle_adapter);
    assert!(params.dispute_window > 0);
}

// ============================================================================
// Proposals
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_signed_proposal_matches_adapter_hash() {
    let client = client_or_skip!(false);
    let Some(key) = env_var("ORACLE_SIGNER_KEY") else {
        println!("Skipping: ORACLE_SIGNER_KEY not configured");
        return;
    };
    let signer: PrivateKeySigner = key.parse().unwrap();
    let oracle = client.oracle();

    let params = ProposalParams {
        market_id: MarketId::new(1),
        outcome_id: OutcomeId::new(0),
        close_time: now_timestamp(),
        evidence_hash: evidence_hash(b"integration test evidence"),
        validity_window: 3_600,
        deadline: now_timestamp() + 600,
    };
    let proposal =
        SignedProposal::new_signed(params, &signer, client.chain_id(), oracle.address()).unwrap();

    assert_eq!(oracle.hash_proposal(&proposal).await.unwrap(), oracle.proposal_id(&proposal));
    assert!(oracle.verify_proposal(&proposal).await.unwrap());
    assert!(!oracle
        .is_proposal_used(oracle.proposal_id(&proposal))
        .await
        .unwrap());
}

// ============================================================================
// Watchers
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_watch_market_status_changes() {
    let client = client_or_skip!(false);
    let (sink, mut receiver) = tokio::sync::mpsc::channel(16);
    let handle = client
        .factory()
        .watch_market_status_changed(sink, &[])
        .await
        .unwrap();
    assert!(handle.is_running());

    match tokio::time::timeout(Duration::from_secs(10), receiver.recv()).await {
        Ok(Some(log)) => println!("Status change: {:?}", log.event),
        _ => println!("No status change within 10s"),
    }
    handle.unsubscribe().await.unwrap();
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_create_market() {
    let client = client_or_skip!(true);
    let Some(collateral) = env_var("COLLATERAL_TOKEN") else {
        println!("Skipping: COLLATERAL_TOKEN not configured");
        return;
    };
    let params = CreateMarketParams {
        collateral_token: collateral.parse().unwrap(),
        outcome_count: 2,
        close_time: now_timestamp() + 86_400,
        question_hash: question_hash("Integration test market"),
        fee: 3_000,
        tick_spacing: 60,
        initial_sqrt_price_x96: oracle_markets::shared::sqrt_ratio_at_tick(0).unwrap(),
    };
    let created = client
        .factory()
        .create_market_and_confirm(&params)
        .await
        .unwrap();
    println!("Created market: {:?}", created);

    let market = client.factory().get_market(created.market_id).await.unwrap();
    assert_eq!(market.amm, created.amm);
    assert_eq!(market.status, MarketStatus::Open);
}
