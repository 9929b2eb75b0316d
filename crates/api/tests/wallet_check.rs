// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the wallet check endpoint

mod fixtures;

use std::time::Duration;

use alloy_primitives::Address;
use api::config::TimeoutSeconds;
use fixtures::{TestApp, wallet};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn body(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse response body")
}

#[tokio::test]
async fn holders_from_indexing_api() {
    let app = TestApp::spawn().await;
    app.mount_holdings(wallet(0x11), &["1", "2"]).await;
    app.mount_holdings(wallet(0x22), &[]).await;

    let response = app
        .check(json!({ "addresses": [wallet(0x11).to_string(), wallet(0x22).to_string()] }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0]["hasToken"], true);
    assert_eq!(results[0]["tokenCount"], 2);
    assert_eq!(results[0]["tokenIds"], json!(["1", "2"]));
    assert_eq!(results[0]["assets"].as_array().unwrap().len(), 2);
    assert_eq!(results[0]["source"], "INDEX_API");

    assert_eq!(results[1]["hasToken"], false);
    assert_eq!(results[1]["tokenCount"], 0);
    assert!(results[1].get("errorMessage").is_none());

    assert_eq!(body["summary"]["holders"], 1);
    assert_eq!(body["summary"]["nonHolders"], 1);
    assert_eq!(body["cancelled"], false);
    let contract: Address = body["contractAddress"].as_str().unwrap().parse().unwrap();
    assert_eq!(contract, fixtures::collection());
    assert_eq!(app.rpc_requests().await, 0);
}

#[tokio::test]
async fn invalid_address_becomes_a_record() {
    let app = TestApp::spawn().await;
    app.mount_holdings(wallet(0x11), &[]).await;

    let response = app
        .check(json!({ "addresses": [wallet(0x11).to_string(), "not-an-address"] }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["hasToken"], false);
    assert!(results[0].get("errorMessage").is_none());
    assert_eq!(results[1]["address"], "not-an-address");
    assert_eq!(results[1]["hasToken"], false);
    assert_eq!(results[1]["errorMessage"], "Invalid address");
    assert_eq!(body["summary"]["errors"], 1);

    // Only the valid address reached the indexing API
    assert_eq!(app.opensea_requests().await, 1);
}

#[tokio::test]
async fn indexing_failure_switches_batch_to_chain() {
    let app = TestApp::spawn().await;
    app.mount_holdings(wallet(0x11), &["7"]).await;
    app.mount_opensea_failure(wallet(0x22), 503).await;
    app.mount_holdings(wallet(0x33), &["8"]).await;
    app.mount_balance(1).await;

    let response = app
        .check(json!({
            "addresses": [
                wallet(0x11).to_string(),
                wallet(0x22).to_string(),
                wallet(0x33).to_string()
            ]
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body(response).await;
    let results = body["results"].as_array().unwrap();

    assert_eq!(results[0]["source"], "INDEX_API");

    assert_eq!(results[1]["source"], "CHAIN");
    assert_eq!(results[1]["hasToken"], true);
    assert_eq!(results[1]["tokenCount"], 1);
    assert!(
        results[1]["errorMessage"]
            .as_str()
            .unwrap()
            .contains("indexing API failed")
    );
    assert!(results[1].get("tokenIds").is_none());

    assert_eq!(results[2]["source"], "CHAIN");
    assert_eq!(results[2]["hasToken"], true);
    assert!(results[2].get("errorMessage").is_none());

    assert_eq!(body["summary"]["degraded"], 1);
    // The third address never went to the indexing API
    assert_eq!(app.opensea_requests().await, 2);
    assert_eq!(app.rpc_requests().await, 2);
}

#[tokio::test]
async fn chain_failure_after_retries() {
    let app = TestApp::spawn().await;
    app.mount_opensea_failure(wallet(0x11), 500).await;
    app.mount_balance_error().await;

    let response = app
        .check(json!({ "addresses": [wallet(0x11).to_string()] }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body(response).await;
    let result = &body["results"][0];
    assert_eq!(result["hasToken"], false);
    assert_eq!(result["source"], "CHAIN");
    assert!(
        result["errorMessage"]
            .as_str()
            .unwrap()
            .starts_with("Error checking wallet on chain")
    );
    assert_eq!(body["summary"]["errors"], 1);
    // First attempt plus two retries
    assert_eq!(app.rpc_requests().await, 3);
}

#[tokio::test]
async fn request_deadline_returns_partial_results() {
    let app = TestApp::spawn_with(|config| {
        config.timeout_seconds = TimeoutSeconds::new(1).unwrap();
        config.rpc.timeout_seconds = TimeoutSeconds::new(10).unwrap();
        config.checker.address_timeout_seconds = TimeoutSeconds::new(2).unwrap();
    })
    .await;
    app.mount_opensea_failure(wallet(0x11), 503).await;
    app.mount_slow_balance(1, Duration::from_secs(10)).await;

    let response = app
        .check(json!({ "addresses": [wallet(0x11).to_string(), wallet(0x22).to_string()] }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body(response).await;
    assert_eq!(body["cancelled"], true);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["hasToken"], false);
    assert_eq!(results[0]["errorMessage"], "Unknown error checking wallet");
    assert_eq!(body["summary"]["total"], 1);
    assert_eq!(body["summary"]["errors"], 1);
    // The second address was never looked up
    assert_eq!(app.opensea_requests().await, 1);
}

#[tokio::test]
async fn filter_selects_holders() {
    let app = TestApp::spawn().await;
    app.mount_holdings(wallet(0x11), &["1"]).await;
    app.mount_holdings(wallet(0x22), &[]).await;

    let response = app
        .check(json!({
            "addresses": [wallet(0x11).to_string(), wallet(0x22).to_string(), "bogus"],
            "filter": "holders"
        }))
        .await;
    let body = body(response).await;
    assert_eq!(body["filteredAddresses"], json!([wallet(0x11).to_string()]));

    let response = app
        .check(json!({
            "addresses": [wallet(0x11).to_string(), wallet(0x22).to_string(), "bogus"],
            "filter": "nonHolders"
        }))
        .await;
    let body = self::body(response).await;
    assert_eq!(body["filteredAddresses"], json!([wallet(0x22).to_string()]));
}

#[tokio::test]
async fn empty_address_list_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.check(json!({ "addresses": [] })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body(response).await;
    assert_eq!(body["status"], 400);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("addresses list cannot be empty")
    );
}

#[tokio::test]
async fn oversized_batch_is_rejected() {
    let app = TestApp::spawn_with(|config| config.max_batch_size = 2).await;

    let response = app
        .check(json!({ "addresses": ["0x1", "0x2", "0x3"] }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.opensea_requests().await, 0);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("http://{}/v1/wallets/check", app.addr))
        .header("content-type", "application/json")
        .body(r#"{"addresses": ["0x1",, "0x2"]}"#)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body(response).await;
    assert!(body["error"].as_str().unwrap().contains("invalid JSON syntax"));
}

#[tokio::test]
async fn health_check() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("http://{}/health", app.addr))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body(response).await;
    assert_eq!(body["status"], "Up");
    assert_eq!(body["environment"], "testing");
    assert_eq!(body["chain"], 1);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("http://{}/api-doc/openapi.json", app.addr))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body(response).await;
    assert!(body["paths"].get("/v1/wallets/check").is_some());
}
