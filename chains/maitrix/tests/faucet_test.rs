mod common;

use common::{account, FakeFaucet};
use maitrix_bot::faucet::{ClaimResult, FaucetCollector, FAUCET_TARGETS};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const ATH: &str = "https://app.x-network.io/maitrix-faucet/faucet";
const USDE: &str = "https://app.x-network.io/maitrix-usde/faucet";
const LVL: &str = "https://app.x-network.io/maitrix-lvl/faucet";
const VIRTUAL: &str = "https://app.x-network.io/maitrix-virtual/faucet";
const USD1: &str = "https://app.x-network.io/maitrix-usd1/faucet";
const AI16Z: &str = "https://app.x-network.io/maitrix-ai16z/faucet";

fn collector(faucet: Arc<FakeFaucet>) -> FaucetCollector {
    FaucetCollector::new(faucet).with_spacing(Duration::ZERO)
}

fn all_plain_ok(faucet: FakeFaucet) -> FakeFaucet {
    faucet
        .respond(ATH, 200, None)
        .respond(USDE, 200, Some(json!({ "ok": true })))
        .respond(LVL, 201, None)
        .respond(VIRTUAL, 200, None)
}

#[tokio::test]
async fn test_visits_every_target_despite_failures() {
    let faucet = Arc::new(
        FakeFaucet::new()
            .fail(ATH, "Error 500")
            .respond(USDE, 200, None)
            .fail(USD1, "No response from server."),
    );

    let summary = collector(faucet.clone()).claim_all(account()).await;

    let expected: Vec<&str> = FAUCET_TARGETS.iter().map(|t| t.url).collect();
    assert_eq!(faucet.visited(), expected);
    assert_eq!(summary.total, 6);
    assert_eq!(summary.processed, 1);
    assert!(!summary.significant);
    assert_eq!(summary.claims[0].result, Err("Error 500".to_string()));
}

#[tokio::test]
async fn test_usd1_claim_is_significant() {
    let faucet = Arc::new(
        all_plain_ok(FakeFaucet::new())
            .respond(USD1, 200, Some(json!({ "code": 200, "data": { "txHash": "0xfeed00c0ffee" } })))
            .respond(AI16Z, 200, Some(json!({ "code": 202, "data": { "remainTime": 60 } }))),
    );

    let summary = collector(faucet).claim_all(account()).await;

    assert_eq!(summary.processed, 6);
    assert!(summary.significant);
    assert_eq!(
        summary.claims[4].result,
        Ok(ClaimResult::Claimed {
            tx_hash: Some("0xfeed00c0ffee".into())
        })
    );
}

#[tokio::test]
async fn test_already_claimed_is_processed_not_significant() {
    let faucet = Arc::new(
        FakeFaucet::new()
            .respond(USD1, 200, Some(json!({ "code": 202, "data": { "remainTime": 3661 } })))
            .respond(AI16Z, 200, Some(json!({ "code": 202, "data": { "remainTime": "7200" } }))),
    );

    let summary = collector(faucet).claim_all(account()).await;

    assert_eq!(summary.processed, 2);
    assert!(!summary.significant);
    let usd1 = summary.claims[4].result.as_ref().unwrap();
    assert_eq!(usd1.to_string(), "Already claimed. Retry in 1h 1m.");
}

#[tokio::test]
async fn test_plain_targets_never_significant() {
    // a plain faucet echoing a success code still only counts as processed
    let faucet = Arc::new(
        FakeFaucet::new().respond(ATH, 200, Some(json!({ "code": 200, "data": { "txHash": "0x01" } }))),
    );

    let summary = collector(faucet).claim_all(account()).await;

    assert_eq!(summary.processed, 1);
    assert!(!summary.significant);
    assert_eq!(
        summary.claims[0].result,
        Ok(ClaimResult::Unclassified { status: 200 })
    );
}

#[tokio::test]
async fn test_rejected_code_not_processed() {
    let faucet = Arc::new(
        FakeFaucet::new()
            .respond(AI16Z, 200, Some(json!({ "code": 429, "message": "Too many requests" })))
            .respond(USD1, 200, Some(json!({ "status": "queued" }))),
    );

    let summary = collector(faucet).claim_all(account()).await;

    // USD1 has no code field and is accepted leniently
    assert_eq!(summary.processed, 1);
    assert_eq!(
        summary.claims[5].result,
        Ok(ClaimResult::Rejected {
            message: "Too many requests".into()
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_spacing_after_every_target() {
    let faucet = Arc::new(FakeFaucet::new());
    let started = tokio::time::Instant::now();

    FaucetCollector::new(faucet).claim_all(account()).await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(12) && elapsed < Duration::from_secs(13));
}

#[tokio::test]
async fn test_custom_target_list() {
    let faucet = Arc::new(
        FakeFaucet::new().respond(AI16Z, 200, Some(json!({ "code": 200, "data": {} }))),
    );

    let summary = collector(faucet.clone())
        .with_targets(vec![FAUCET_TARGETS[5].clone()])
        .claim_all(account())
        .await;

    assert_eq!(faucet.visited(), vec![AI16Z]);
    assert_eq!(summary.total, 1);
    assert!(summary.significant);
}
