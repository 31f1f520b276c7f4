use crate::common::chain::{address, block, payment, MockChain};
use crate::common::rpc_client;
use anyhow::Result;
use bitcoin::{Amount, Network};
use btc_query::errors::RpcError;
use btc_query::scanner::BlockScanner;
use std::sync::Arc;
use std::time::Duration;

/// Tests for the block-range scanner
///
/// Chains are built in memory; heights are the block's index in the chain.

fn scanner_over(chain: &Arc<MockChain>, depth: u64) -> BlockScanner {
    BlockScanner::new(Arc::new(rpc_client(chain)), Network::Bitcoin, depth)
}

#[tokio::test]
async fn test_sums_deposits_in_range_only() -> Result<()> {
    let alice = address(1);
    let bob = address(2);

    let chain = Arc::new(MockChain::new(vec![
        // Height 0 falls outside a depth-2 scan of a tip-3 chain
        block(vec![payment(&[(&alice, 1_000_000)])]),
        block(vec![payment(&[(&alice, 10), (&bob, 99)])]),
        block(vec![payment(&[(&bob, 5)]), payment(&[(&alice, 20)])]),
        block(vec![payment(&[(&alice, 30), (&alice, 40)])]),
    ]));

    let summary = scanner_over(&chain, 2).scan(&alice.to_string()).await?;

    assert_eq!(summary.from_height, 1);
    assert_eq!(summary.to_height, 3);
    assert_eq!(summary.blocks_scanned, 3);
    assert_eq!(summary.total_sat, 100);
    assert_eq!(summary.deposits.len(), 4);
    assert!(summary.deposits.iter().all(|d| d.address == alice.to_string()));
    // Sorted by height regardless of completion order
    let heights: Vec<u64> = summary.deposits.iter().map(|d| d.height).collect();
    assert_eq!(heights, vec![1, 2, 3, 3]);

    Ok(())
}

#[tokio::test]
async fn test_total_independent_of_completion_order() -> Result<()> {
    let carol = address(3);

    // Earlier heights answer last
    let chain = Arc::new(
        MockChain::new(vec![
            block(vec![payment(&[(&carol, 1)])]),
            block(vec![payment(&[(&carol, 2)])]),
            block(vec![payment(&[(&carol, 4)])]),
            block(vec![payment(&[(&carol, 8)])]),
        ])
        .with_delay(0, Duration::from_millis(150))
        .with_delay(1, Duration::from_millis(100))
        .with_delay(2, Duration::from_millis(50)),
    );

    let balance = scanner_over(&chain, 3).balance_of(&carol.to_string()).await?;
    assert_eq!(balance, Amount::from_sat(15));

    Ok(())
}

#[tokio::test]
async fn test_single_block_failure_fails_whole_scan() {
    let dave = address(4);
    let chain = Arc::new(MockChain::new(vec![
        block(vec![payment(&[(&dave, 1)])]),
        block(vec![payment(&[(&dave, 2)])]),
        block(vec![payment(&[(&dave, 3)])]),
    ]));
    chain.fail_height(1);

    let err = scanner_over(&chain, 2)
        .balance_of(&dave.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::DeserialisationFailed(msg) if msg.contains("height 1")));
}

#[tokio::test]
async fn test_tip_lookup_failure_is_returned() {
    let chain = Arc::new(MockChain::new(vec![block(vec![])]));
    chain.set_down(true);

    let err = scanner_over(&chain, 5)
        .balance_of(&address(5).to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::CallFailed { method, .. } if method == "getblockcount"));
    assert_eq!(chain.block_calls(), 0);
}

#[tokio::test]
async fn test_depth_beyond_genesis_scans_whole_chain() -> Result<()> {
    let erin = address(6);
    let chain = Arc::new(MockChain::new(vec![
        block(vec![payment(&[(&erin, 7)])]),
        block(vec![]),
    ]));

    let summary = scanner_over(&chain, 100).scan(&erin.to_string()).await?;
    assert_eq!(summary.from_height, 0);
    assert_eq!(summary.blocks_scanned, 2);
    assert_eq!(summary.total_sat, 7);
    assert_eq!(chain.block_calls(), 2);

    Ok(())
}

#[tokio::test]
async fn test_zero_depth_scans_tip_only() -> Result<()> {
    let frank = address(7);
    let chain = Arc::new(MockChain::new(vec![
        block(vec![payment(&[(&frank, 7)])]),
        block(vec![payment(&[(&frank, 9)])]),
    ]));

    let summary = scanner_over(&chain, 0).scan(&frank.to_string()).await?;
    assert_eq!((summary.from_height, summary.to_height), (1, 1));
    assert_eq!(summary.total_sat, 9);

    Ok(())
}

#[tokio::test]
async fn test_address_without_deposits_has_zero_balance() -> Result<()> {
    let chain = Arc::new(MockChain::new(vec![block(vec![payment(&[(&address(8), 500)])])]));

    let balance = scanner_over(&chain, 10)
        .balance_of(&address(9).to_string())
        .await?;
    assert_eq!(balance, Amount::ZERO);

    Ok(())
}

#[tokio::test]
async fn test_invalid_address_rejected_before_node_calls() {
    let chain = Arc::new(MockChain::new(vec![block(vec![])]));

    let err = scanner_over(&chain, 1)
        .scan("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx")
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::InvalidAddress { .. }));
    assert_eq!(chain.block_count_calls(), 0);
}
