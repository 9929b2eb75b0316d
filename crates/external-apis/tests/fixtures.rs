// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! Mock responses for the indexing API and the JSON-RPC node

use alloy_primitives::{Address, U256, hex};
use serde_json::{Value, json};
use shared_types::ChainId;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

pub const TEST_API_KEY: &str = "test-api-key";

/// Collection used by every test
pub fn collection() -> Address {
    Address::from([0xc0; 20])
}

/// Another collection the same wallets hold tokens of
pub fn other_collection() -> Address {
    Address::from([0x0f; 20])
}

/// OpenSea v2 account endpoint mocks
#[derive(Debug)]
pub struct OpenSeaFixture;

impl OpenSeaFixture {
    /// Path of the account NFTs endpoint for `owner`
    pub fn account_path(chain: ChainId, owner: Address) -> String {
        format!("/chain/{}/account/{owner}/nfts", chain.slug())
    }

    /// A single NFT item as OpenSea returns it
    pub fn nft(identifier: &str, contract: Address) -> Value {
        json!({
            "identifier": identifier,
            "collection": "test-collection",
            "contract": contract.to_string().to_lowercase(),
            "token_standard": "erc721",
            "name": format!("Test Token #{identifier}"),
            "image_url": format!("https://img.example.com/{identifier}.png"),
            "opensea_url": format!("https://opensea.io/assets/ethereum/{contract}/{identifier}"),
            "updated_at": "2025-01-01T00:00:00.000000",
            "is_disabled": false,
            "is_nsfw": false
        })
    }

    /// Account response holding `nfts`
    pub fn account_response(nfts: Vec<Value>) -> Value {
        json!({ "nfts": nfts, "next": null })
    }

    /// Mount a 200 response for `owner`
    pub async fn mount_account(mock_server: &MockServer, owner: Address, nfts: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(Self::account_path(ChainId::Ethereum, owner)))
            .and(header("X-API-KEY", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::account_response(nfts)))
            .mount(mock_server)
            .await;
    }

    /// Mount an error status for `owner`
    pub async fn mount_status(mock_server: &MockServer, owner: Address, status: u16) {
        Mock::given(method("GET"))
            .and(path(Self::account_path(ChainId::Ethereum, owner)))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
            .mount(mock_server)
            .await;
    }
}

/// JSON-RPC node mocks
#[derive(Debug)]
pub struct RpcFixture;

impl RpcFixture {
    /// ABI-encoded `uint256` as a hex string
    pub fn uint256(value: U256) -> String {
        hex::encode_prefixed(value.to_be_bytes::<32>())
    }

    /// Successful JSON-RPC envelope
    pub fn result(result: Value) -> Value {
        json!({ "jsonrpc": "2.0", "id": 1, "result": result })
    }

    /// JSON-RPC error envelope
    pub fn error(code: i64, message: &str) -> Value {
        json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": code, "message": message } })
    }

    /// Mock matching `eth_call` requests
    pub fn eth_call() -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_partial_json(json!({ "jsonrpc": "2.0", "method": "eth_call" })))
    }

    /// Mount an `eth_call` that returns `balance` for every owner
    pub async fn mount_balance(mock_server: &MockServer, balance: u64) {
        Self::eth_call()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(Self::result(json!(Self::uint256(U256::from(balance))))),
            )
            .mount(mock_server)
            .await;
    }

    /// Mount an `eth_chainId` answer
    pub async fn mount_chain_id(mock_server: &MockServer, chain_id: u64) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_chainId" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(Self::result(json!(format!("{chain_id:#x}")))),
            )
            .mount(mock_server)
            .await;
    }
}
