//! # End-to-end pipeline
//!
//! Proves the fixture chain with the mock backend and submits the link
//! proofs to a wiremock JSON-RPC endpoint.

use std::sync::Arc;

use acp_cli::submit::{exit_code, EXIT_SUBMISSION_FAILED};
use acp_cli::{Pipeline, PipelineError};
use acp_core::CircuitAssets;
use acp_rpc::{RpcConfig, SubmissionAggregator, SubmissionMode};
use acp_x509::{load_pem_chain, StaticChainProvider};
use acp_zkp::{MockCommitter, MockProver};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALIAS: &str = "secure-key";

fn pipeline() -> Pipeline {
    let bundle = concat!(env!("CARGO_MANIFEST_DIR"), "/../acp-x509/tests/fixtures/chain.pem");
    let chain = load_pem_chain(&std::fs::read(bundle).unwrap()).unwrap();
    Pipeline::new(
        Arc::new(StaticChainProvider::new().with_chain(ALIAS, chain)),
        Arc::new(MockCommitter::new()),
        Arc::new(MockProver::new()),
        CircuitAssets::default(),
    )
}

async fn accept_to(server: &MockServer, to: &str) {
    Mock::given(method("POST"))
        .and(path("/test-key"))
        .and(body_partial_json(json!({
            "method": "eth_call",
            "params": [{ "to": to }, "latest"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 1, "result": "0x0000000000000000000000000000000000000000000000000000000000000001"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn chain_is_proved_and_routed_per_family() {
    let server = MockServer::start().await;
    let config = RpcConfig::local_mock(&server.uri()).unwrap();
    accept_to(&server, &config.verifiers.ca).await;
    accept_to(&server, &config.verifiers.ee).await;

    let aggregator = SubmissionAggregator::from_config(&config).unwrap();
    let all = pipeline()
        .run(ALIAS, &aggregator, Some("00ff".into()))
        .await
        .unwrap();

    assert!(all.overall_success, "{all:?}");
    assert_eq!(all.results.len(), 2);
    assert_eq!(all.results[0].proof_index, 0);
    assert_eq!(all.results[1].proof_index, 1);
    assert_eq!(exit_code(&all), 0);
}

#[tokio::test]
async fn rejected_leaf_link_fails_only_that_proof() {
    let server = MockServer::start().await;
    let config = RpcConfig::local_mock(&server.uri()).unwrap();
    accept_to(&server, &config.verifiers.ca).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "params": [{ "to": config.verifiers.ee.as_str() }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 2, "error": { "code": 3, "message": "execution reverted" }
        })))
        .mount(&server)
        .await;

    let aggregator = SubmissionAggregator::from_config(&config)
        .unwrap()
        .with_mode(SubmissionMode::Concurrent);
    let all = pipeline().run(ALIAS, &aggregator, None).await.unwrap();

    assert!(!all.overall_success);
    assert!(all.results[0].is_success);
    assert!(!all.results[1].is_success);
    assert_eq!(all.results[1].error.as_deref(), Some("execution reverted"));
    assert_eq!(exit_code(&all), EXIT_SUBMISSION_FAILED);
}

#[tokio::test]
async fn unknown_alias_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = RpcConfig::local_mock(&server.uri()).unwrap();
    let aggregator = SubmissionAggregator::from_config(&config).unwrap();
    let err = pipeline().run("other", &aggregator, None).await.unwrap_err();
    assert!(matches!(err, PipelineError::UnknownAlias(_)));
}
