mod common;

use std::sync::Arc;

use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use common::{ENTRY_POINT, MockBundler, MockChain, OWNER, ret_u256};
use txflow_core::contracts::IEntryPoint;
use txflow_pipeline::{EntryPointClient, NonceManager};

fn manager(chain: Arc<MockChain>, bundler: Arc<MockBundler>) -> NonceManager<MockChain, MockBundler> {
    NonceManager::new(EntryPointClient::new(chain, ENTRY_POINT), bundler)
}

#[tokio::test]
async fn undeployed_account_is_nonce_zero_without_any_query() {
    let chain = Arc::new(MockChain::new());
    let bundler = Arc::new(MockBundler::new());
    let manager = manager(chain.clone(), bundler.clone());

    let nonce = manager.nonce_for(OWNER, false).await;

    assert_eq!(nonce, U256::ZERO);
    assert!(chain.recorded_calls().is_empty());
    assert!(bundler.count_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn deployed_account_nonce_comes_from_the_entry_point() {
    let chain = Arc::new(MockChain::new().with_call(
        ENTRY_POINT,
        IEntryPoint::getNonceCall::SELECTOR,
        ret_u256(U256::from(7)),
    ));
    let bundler = Arc::new(MockBundler::new());

    let nonce = manager(chain, bundler.clone()).nonce_for(OWNER, true).await;

    assert_eq!(nonce, U256::from(7));
    // the fallback was never consulted
    assert!(bundler.count_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn entry_point_failure_falls_back_to_the_bundler_count() {
    let chain =
        Arc::new(MockChain::new().with_failing_selector(IEntryPoint::getNonceCall::SELECTOR));
    let bundler = Arc::new(MockBundler::new().with_operation_count(Some(U256::from(3))));

    let nonce = manager(chain, bundler.clone()).nonce_for(OWNER, true).await;

    assert_eq!(nonce, U256::from(3));
    assert_eq!(bundler.count_requests.lock().unwrap().as_slice(), &[OWNER]);
}

#[tokio::test]
async fn exhausted_fallback_chain_degrades_to_zero() {
    let chain =
        Arc::new(MockChain::new().with_failing_selector(IEntryPoint::getNonceCall::SELECTOR));
    let bundler = Arc::new(MockBundler::new().with_operation_count(None));

    let nonce = manager(chain, bundler).nonce_for(OWNER, true).await;

    assert_eq!(nonce, U256::ZERO);
}
