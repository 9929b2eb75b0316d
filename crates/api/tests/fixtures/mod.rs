// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(dead_code)]

//! Test server and provider mocks
//!
//! Starts the server against two wiremock instances, one standing in for the
//! OpenSea API and one for the JSON-RPC node.

use std::{net::SocketAddr, time::Duration};

use alloy_primitives::{Address, U256, hex};
use api::{Server, ServerConfig, ShutdownConfig};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

/// Wallet built from a repeated byte
pub fn wallet(byte: u8) -> Address {
    Address::from([byte; 20])
}

/// Collection configured by [`ServerConfig::for_testing`]
pub fn collection() -> Address {
    Address::from([0xc0; 20])
}

/// A running server and its provider mocks
pub struct TestApp {
    pub addr: SocketAddr,
    pub shutdown: CancellationToken,
    pub opensea: MockServer,
    pub rpc: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start a server whose providers point at fresh mocks
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Start a server after adjusting the testing configuration
    pub async fn spawn_with(configure: impl FnOnce(&mut ServerConfig)) -> Self {
        let opensea = MockServer::start().await;
        let rpc = MockServer::start().await;

        let mut config = ServerConfig::for_testing();
        config.opensea.base_url = opensea.uri();
        config.rpc.url = rpc.uri();
        configure(&mut config);

        let (addr, shutdown) = Server::new(config, ShutdownConfig::default())
            .expect("Failed to create server")
            .run_for_testing()
            .await
            .expect("Failed to start test server");

        Self {
            addr,
            shutdown,
            opensea,
            rpc,
            client: reqwest::Client::new(),
        }
    }

    /// POST a wallet check
    pub async fn check(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("http://{}/v1/wallets/check", self.addr))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Return `nfts` of the collection for `owner`
    pub async fn mount_holdings(&self, owner: Address, identifiers: &[&str]) {
        let nfts: Vec<Value> = identifiers
            .iter()
            .map(|identifier| {
                json!({
                    "identifier": identifier,
                    "contract": collection().to_string().to_lowercase(),
                    "name": format!("Test Token #{identifier}"),
                    "image_url": format!("https://img.example.com/{identifier}.png"),
                    "opensea_url": format!("https://opensea.io/assets/ethereum/{}/{identifier}", collection()),
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(format!("/chain/ethereum/account/{owner}/nfts")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nfts": nfts })))
            .mount(&self.opensea)
            .await;
    }

    /// Fail the OpenSea lookup for `owner` with `status`
    pub async fn mount_opensea_failure(&self, owner: Address, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/chain/ethereum/account/{owner}/nfts")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.opensea)
            .await;
    }

    /// Answer every `balanceOf` call with `balance`
    pub async fn mount_balance(&self, balance: u64) {
        let encoded = hex::encode_prefixed(U256::from(balance).to_be_bytes::<32>());
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_call" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": encoded })),
            )
            .mount(&self.rpc)
            .await;
    }

    /// Answer every `balanceOf` call with `balance` after `delay`
    pub async fn mount_slow_balance(&self, balance: u64, delay: Duration) {
        let encoded = hex::encode_prefixed(U256::from(balance).to_be_bytes::<32>());
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_call" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": encoded }))
                    .set_delay(delay),
            )
            .mount(&self.rpc)
            .await;
    }

    /// Revert every `balanceOf` call
    pub async fn mount_balance_error(&self) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_call" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32000, "message": "execution reverted" }
            })))
            .mount(&self.rpc)
            .await;
    }

    /// Number of requests OpenSea received
    pub async fn opensea_requests(&self) -> usize {
        self.opensea
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }

    /// Number of requests the node received
    pub async fn rpc_requests(&self) -> usize {
        self.rpc
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}
