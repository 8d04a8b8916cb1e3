//! # Submission Aggregator
//!
//! Submits each proof as an `eth_call` to its family's verifier and
//! records one [`SubmissionResult`] per proof. Items are independent: a
//! failed item never stops the rest of the batch, and nothing here returns
//! an error.
//!
//! ## Ordering
//!
//! Results are always in proof order. In
//! [`SubmissionMode::Concurrent`] each proof runs as its own task and the
//! handles are joined in spawn order.

use std::sync::Arc;

use acp_core::{AllProofsResult, ProofResult, SubmissionResult};
use tracing::Instrument;

use crate::abi::encode_for_verifier_call;
use crate::config::{RpcConfig, SubmissionMode, VerifierAddresses};
use crate::error::TransportError;
use crate::jsonrpc::{classify_response, eth_call_request};
use crate::transport::{HttpRpcTransport, RpcTransport};

/// Submits proof batches over an [`RpcTransport`].
#[derive(Clone)]
pub struct SubmissionAggregator {
    transport: Arc<dyn RpcTransport>,
    verifiers: VerifierAddresses,
    mode: SubmissionMode,
}

impl std::fmt::Debug for SubmissionAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionAggregator")
            .field("verifiers", &self.verifiers)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl SubmissionAggregator {
    pub fn new(transport: Arc<dyn RpcTransport>, verifiers: VerifierAddresses) -> Self {
        Self {
            transport,
            verifiers,
            mode: SubmissionMode::Sequential,
        }
    }

    /// Aggregator over an [`HttpRpcTransport`] built from `config`.
    pub fn from_config(config: &RpcConfig) -> Result<Self, TransportError> {
        let transport = HttpRpcTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config.verifiers.clone()).with_mode(config.mode))
    }

    pub fn with_mode(mut self, mode: SubmissionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> SubmissionMode {
        self.mode
    }

    /// Submit every proof and aggregate the outcomes.
    pub async fn submit_all(&self, proofs: &[ProofResult]) -> AllProofsResult {
        let results = match self.mode {
            SubmissionMode::Sequential => {
                let mut results = Vec::with_capacity(proofs.len());
                for (index, proof) in proofs.iter().enumerate() {
                    results.push(self.submit_one(index, proof).await);
                }
                results
            }
            SubmissionMode::Concurrent => {
                let handles: Vec<_> = proofs
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(index, proof)| {
                        let this = self.clone();
                        tokio::spawn(async move { this.submit_one(index, &proof).await })
                    })
                    .collect();
                let mut results = Vec::with_capacity(handles.len());
                for (index, handle) in handles.into_iter().enumerate() {
                    results.push(handle.await.unwrap_or_else(|e| {
                        SubmissionResult::failure(index, None, format!("submission task failed: {e}"))
                    }));
                }
                results
            }
        };

        let all = AllProofsResult::from_results(results);
        tracing::info!(
            total = all.results.len(),
            failed = all.failed().count(),
            overall_success = all.overall_success,
            "submission batch complete"
        );
        all
    }

    /// Submit a single proof.
    pub async fn submit_one(&self, index: usize, proof: &ProofResult) -> SubmissionResult {
        let to = self.verifiers.for_family(proof.family());
        let data = match encode_for_verifier_call(proof) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(index, error = %e, "proof could not be encoded");
                return SubmissionResult::failure(index, None, e.to_string());
            }
        };

        let request = eth_call_request(to, &data);
        let span = tracing::info_span!("submit_proof", index, to);
        let result = match self.transport.post(&request).instrument(span).await {
            Ok(response) => classify_response(index, &response),
            Err(e) => SubmissionResult::failure(index, None, e.to_string()),
        };

        if result.is_success {
            tracing::info!(index, to, "proof accepted");
        } else {
            tracing::warn!(index, to, error = ?result.error, "proof submission failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonrpc::RpcResponse;
    use acp_core::{CircuitFamily, Commitment};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Records request bodies and answers from a fixed script.
    struct ScriptedTransport {
        seen: Mutex<Vec<Value>>,
        /// Fail at the transport level when the call data contains this.
        fail_data_containing: Option<String>,
    }

    #[async_trait]
    impl RpcTransport for ScriptedTransport {
        async fn post(&self, body: &Value) -> Result<RpcResponse, TransportError> {
            self.seen.lock().unwrap().push(body.clone());
            let data = body["params"][0]["data"].as_str().unwrap_or_default();
            if self
                .fail_data_containing
                .as_deref()
                .is_some_and(|marker| data.contains(marker))
            {
                return Err(TransportError::Config(crate::config::ConfigError::MissingApiKey));
            }
            Ok(RpcResponse {
                status: 200,
                reason: "OK".into(),
                body: r#"{"jsonrpc":"2.0","id":1,"result":"0x"}"#.into(),
            })
        }
    }

    fn scripted(fail_data_containing: Option<&str>) -> Arc<ScriptedTransport> {
        Arc::new(ScriptedTransport {
            seen: Mutex::new(Vec::new()),
            fail_data_containing: fail_data_containing.map(str::to_string),
        })
    }

    fn proof(family: CircuitFamily) -> ProofResult {
        filled(family, "00")
    }

    /// Proof whose public inputs and body are `fill` repeated.
    fn filled(family: CircuitFamily, fill: &str) -> ProofResult {
        let payload = fill.repeat(288 + 32);
        ProofResult::new(format!("{}_0x{payload}", family.tag()), Commitment::new("c", "r"))
    }

    fn marker(fill: &str) -> String {
        fill.repeat(64)
    }

    #[tokio::test]
    async fn routes_by_family() {
        let transport = scripted(None);
        let agg = SubmissionAggregator::new(transport.clone(), VerifierAddresses::default());
        let all = agg
            .submit_all(&[proof(CircuitFamily::Ca), proof(CircuitFamily::EndEntity)])
            .await;
        assert!(all.overall_success);

        let seen = transport.seen.lock().unwrap();
        let v = VerifierAddresses::default();
        assert_eq!(seen[0]["params"][0]["to"], v.ca.as_str());
        assert_eq!(seen[1]["params"][0]["to"], v.ee.as_str());
        assert!(seen[0]["params"][0]["data"]
            .as_str()
            .unwrap()
            .starts_with("0xea50d0e4"));
        assert!(seen.iter().all(|body| body["id"] == 1));
    }

    #[tokio::test]
    async fn transport_error_is_recorded_and_batch_continues() {
        let transport = scripted(Some(&marker("11")));
        let agg = SubmissionAggregator::new(transport.clone(), VerifierAddresses::default());
        let all = agg
            .submit_all(&[filled(CircuitFamily::Ca, "11"), filled(CircuitFamily::Ca, "22")])
            .await;
        assert!(!all.overall_success);
        assert!(!all.results[0].is_success);
        assert_eq!(all.results[0].response, None);
        assert!(all.results[0].error.is_some());
        assert!(all.results[1].is_success);
        assert_eq!(transport.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unencodable_proof_is_not_sent() {
        let transport = scripted(None);
        let agg = SubmissionAggregator::new(transport.clone(), VerifierAddresses::default());
        let bad = ProofResult::new("ca_0xabcd", Commitment::new("c", "r"));
        let all = agg.submit_all(&[bad, proof(CircuitFamily::Ca)]).await;
        assert!(!all.results[0].is_success);
        assert!(all.results[1].is_success);
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_mode_preserves_order() {
        let transport = scripted(Some(&marker("22")));
        let agg = SubmissionAggregator::new(transport, VerifierAddresses::default())
            .with_mode(SubmissionMode::Concurrent);
        let proofs: Vec<_> = ["11", "22", "33", "44", "55"]
            .iter()
            .map(|fill| filled(CircuitFamily::EndEntity, fill))
            .collect();
        let all = agg.submit_all(&proofs).await;
        let indices: Vec<_> = all.results.iter().map(|r| r.proof_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(!all.results[1].is_success);
        assert_eq!(all.failed().count(), 1);
    }

    #[tokio::test]
    async fn empty_batch_succeeds() {
        let agg = SubmissionAggregator::new(scripted(None), VerifierAddresses::default());
        let all = agg.submit_all(&[]).await;
        assert!(all.overall_success);
        assert!(all.results.is_empty());
    }
}
